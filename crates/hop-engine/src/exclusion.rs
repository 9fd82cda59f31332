//! Exclusion of links inside secondary-topic panels.
//!
//! Secondary-topic panels ("People also ask") are recognised by a marker
//! element sitting a fixed number of levels below the panel container. The
//! container set is rebuilt on every refresh because the page keeps inserting
//! panels as the user scrolls and expands them.

use std::collections::HashSet;

use crate::document::Document;
use crate::path::PathExpr;

/// Computes the current set of excluded containers.
#[derive(Debug, Clone)]
pub struct ExclusionResolver {
    marker: PathExpr,
    depth: usize,
}

impl ExclusionResolver {
    /// Create a resolver. `depth` is the number of parent levels from a marker
    /// to its container.
    pub fn new(marker: PathExpr, depth: usize) -> Self {
        Self { marker, depth }
    }

    /// Marker path expression.
    pub fn marker(&self) -> &PathExpr {
        &self.marker
    }

    /// Levels walked from a marker to its container.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Find every marker in `doc` and collect its container.
    pub fn compute<D: Document>(&self, doc: &D) -> ExclusionSet<D::Element> {
        let containers: HashSet<_> = doc
            .select(&self.marker)
            .filter_map(|marker| {
                let container = doc.nth_parent(&marker, self.depth);
                if container.is_none() {
                    tracing::debug!(?marker, depth = self.depth, "marker has no container");
                }
                container
            })
            .collect();

        tracing::debug!(containers = containers.len(), "computed exclusion set");
        ExclusionSet { containers }
    }
}

/// Containers whose descendant links are never results.
#[derive(Debug, Clone)]
pub struct ExclusionSet<E> {
    containers: HashSet<E>,
}

impl<E> Default for ExclusionSet<E> {
    fn default() -> Self {
        Self {
            containers: HashSet::new(),
        }
    }
}

impl<E: Eq + std::hash::Hash> PartialEq for ExclusionSet<E> {
    fn eq(&self, other: &Self) -> bool {
        self.containers == other.containers
    }
}

impl<E: Eq + std::hash::Hash> Eq for ExclusionSet<E> {}

impl<E: Clone + Eq + std::hash::Hash + std::fmt::Debug> ExclusionSet<E> {
    /// Number of distinct containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Check if no container is excluded.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Whether `el` sits inside (or is) one of the containers.
    pub fn covers<D: Document<Element = E>>(&self, doc: &D, el: &E) -> bool {
        self.containers
            .iter()
            .any(|container| doc.contains(container, el))
    }

    /// The containers.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.containers.iter()
    }
}

/// The single predicate handed to the query engine.
///
/// A link is rejected if it lies in an excluded container or if its resolved
/// target ([`Document::href`]) starts with an excluded prefix.
pub struct ExclusionFilter<'a, E> {
    set: &'a ExclusionSet<E>,
    excluded_targets: &'a [String],
}

impl<'a, E: Clone + Eq + std::hash::Hash + std::fmt::Debug> ExclusionFilter<'a, E> {
    pub fn new(set: &'a ExclusionSet<E>, excluded_targets: &'a [String]) -> Self {
        Self {
            set,
            excluded_targets,
        }
    }

    /// Check whether `el` may be a result.
    pub fn accepts<D: Document<Element = E>>(&self, doc: &D, el: &E) -> bool {
        if self.set.covers(doc, el) {
            tracing::debug!(?el, "skipped: inside secondary-topic panel");
            return false;
        }
        if let Some(href) = doc.href(el) {
            if self
                .excluded_targets
                .iter()
                .any(|prefix| href.starts_with(prefix.as_str()))
            {
                tracing::debug!(?el, href = %href, "skipped: excluded target");
                return false;
            }
        }
        true
    }
}
