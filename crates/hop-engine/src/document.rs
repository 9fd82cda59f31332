//! Document snapshot provider.
//!
//! The engine never owns the page. Every operation borrows the current
//! document, reads what it needs, and drops the borrow before returning, so
//! the page is free to change between two calls.

use std::borrow::Cow;
use std::fmt::Debug;
use std::hash::Hash;

use crate::path::PathExpr;

/// Read access to the page structure plus the few visual mutations the
/// focus cursor performs.
pub trait Document {
    /// Cheap, comparable handle to an element.
    type Element: Clone + Eq + Hash + Debug;

    /// Elements selected by `path`, lazily, in document order.
    fn select<'a>(&'a self, path: &'a PathExpr) -> Box<dyn Iterator<Item = Self::Element> + 'a>;

    /// Parent element, `None` for a top-level or detached element.
    fn parent(&self, el: &Self::Element) -> Option<Self::Element>;

    /// Tag name as written in the page.
    fn tag_name(&self, el: &Self::Element) -> &str;

    /// Attribute value, if present.
    fn attribute(&self, el: &Self::Element, name: &str) -> Option<&str>;

    /// Inline background colour.
    fn background(&self, el: &Self::Element) -> Option<String>;

    /// Replace the inline background colour. `None` clears it.
    fn set_background(&mut self, el: &Self::Element, value: Option<String>);

    /// Give `el` input focus.
    fn focus(&mut self, el: &Self::Element);

    /// Whether `el` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Element, el: &Self::Element) -> bool {
        let mut current = Some(el.clone());
        while let Some(node) = current {
            if &node == ancestor {
                return true;
            }
            current = self.parent(&node);
        }
        false
    }

    /// Walk `n` parents up. `None` if the walk leaves the tree.
    fn nth_parent(&self, el: &Self::Element, n: usize) -> Option<Self::Element> {
        let mut current = el.clone();
        for _ in 0..n {
            current = self.parent(&current)?;
        }
        Some(current)
    }

    /// The link target of `el`, as the page would navigate to it.
    ///
    /// Defaults to the `href` attribute as written. Providers that know the
    /// page URL resolve relative targets against it.
    fn href(&self, el: &Self::Element) -> Option<Cow<'_, str>> {
        self.attribute(el, "href")
            .filter(|href| !href.is_empty())
            .map(Cow::Borrowed)
    }
}

/// Text-input capabilities used by the query-field helper.
pub trait FormDocument: Document {
    /// Length of the field's current value, in characters.
    fn value_len(&self, el: &Self::Element) -> usize;

    /// Set the selection (or caret, when `start == end`).
    fn set_selection_range(&mut self, el: &Self::Element, start: usize, end: usize);

    /// Scroll so `el` is at the top of the viewport.
    fn scroll_into_view(&mut self, el: &Self::Element);
}
