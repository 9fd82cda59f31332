//! Query engine.
//!
//! [`query`] re-runs a path expression against the current document and
//! returns a [`QueryWindow`]: a lazy, bounded, single-pass iterator over one
//! window of the *accepted* match stream. Matches rejected by the predicate
//! consume neither skip nor output slots.

use std::iter::Fuse;

use crate::document::Document;
use crate::path::PathExpr;

/// Predicate applied to each match before it is counted.
pub type Predicate<'p, E> = &'p dyn Fn(&E) -> bool;

/// Window `[skip, skip + count)` over the accepted matches of one query.
///
/// Yields exactly `count` entries. Once the underlying matches run out, every
/// remaining entry is `None`.
pub struct QueryWindow<'p, I: Iterator> {
    matches: Fuse<I>,
    predicate: Option<Predicate<'p, I::Item>>,
    skip: usize,
    remaining: usize,
}

impl<'p, I: Iterator> QueryWindow<'p, I> {
    /// Wrap an arbitrary match stream.
    pub fn new(
        matches: I,
        skip: usize,
        count: usize,
        predicate: Option<Predicate<'p, I::Item>>,
    ) -> Self {
        Self {
            matches: matches.fuse(),
            predicate,
            skip,
            remaining: count,
        }
    }

    fn next_accepted(&mut self) -> Option<I::Item> {
        loop {
            let candidate = self.matches.next()?;
            if self.predicate.is_some_and(|accept| !accept(&candidate)) {
                continue;
            }
            if self.skip > 0 {
                self.skip -= 1;
                continue;
            }
            return Some(candidate);
        }
    }
}

impl<I: Iterator> Iterator for QueryWindow<'_, I> {
    type Item = Option<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.next_accepted())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<I: Iterator> ExactSizeIterator for QueryWindow<'_, I> {}

/// Run `path` against `doc` and window the accepted matches.
pub fn query<'a, D: Document>(
    doc: &'a D,
    path: &'a PathExpr,
    skip: usize,
    count: usize,
    predicate: Option<Predicate<'a, D::Element>>,
) -> QueryWindow<'a, Box<dyn Iterator<Item = D::Element> + 'a>> {
    tracing::debug!(path = %path, skip, count, "running query");
    QueryWindow::new(doc.select(path), skip, count, predicate)
}
