//! Result collection.
//!
//! Owns the candidate list and the two inputs needed to rebuild it: the
//! result path and the exclusion resolver. The list never grows in place;
//! every refresh re-queries from the first match with the new total size.

use crate::document::Document;
use crate::exclusion::{ExclusionFilter, ExclusionResolver};
use crate::path::PathExpr;
use crate::query::query;

/// Ordered, filtered result links currently known.
#[derive(Debug, Clone)]
pub struct ResultCollection<E> {
    results: PathExpr,
    exclusions: ExclusionResolver,
    excluded_targets: Vec<String>,
    candidates: Vec<E>,
}

impl<E: Clone + Eq + std::hash::Hash + std::fmt::Debug> ResultCollection<E> {
    /// Create an empty collection. Nothing is queried until the first refresh.
    pub fn new(
        results: PathExpr,
        exclusions: ExclusionResolver,
        excluded_targets: Vec<String>,
    ) -> Self {
        Self {
            results,
            exclusions,
            excluded_targets,
            candidates: Vec::new(),
        }
    }

    /// Rebuild the candidate list with up to `requested` entries.
    pub fn refresh<D: Document<Element = E>>(&mut self, doc: &D, requested: usize) {
        let excluded = self.exclusions.compute(doc);
        let filter = ExclusionFilter::new(&excluded, &self.excluded_targets);
        let accept = |el: &E| filter.accepts(doc, el);

        // Built in full before it replaces the old list.
        let fresh: Vec<E> = query(doc, &self.results, 0, requested, Some(&accept))
            .map_while(|entry| entry)
            .collect();

        tracing::info!(
            requested,
            found = fresh.len(),
            excluded_containers = excluded.len(),
            "refreshed result candidates"
        );
        self.candidates = fresh;
    }

    /// Number of candidates found by the last refresh.
    pub fn current_size(&self) -> usize {
        self.candidates.len()
    }

    /// Check if the last refresh found nothing.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidate at `index`.
    pub fn get(&self, index: usize) -> Option<&E> {
        self.candidates.get(index)
    }

    /// All candidates in document order.
    pub fn candidates(&self) -> &[E] {
        &self.candidates
    }
}
