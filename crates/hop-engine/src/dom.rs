//! In-memory document.
//!
//! An arena-backed element tree implementing [`Document`] and
//! [`FormDocument`]. The CLI loads it from a JSON page fixture; tests build it
//! node by node and mutate it between navigation calls to model a page that
//! keeps rendering.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::document::{Document, FormDocument};
use crate::error::{EngineError, EngineResult};
use crate::path::PathExpr;

/// Handle to an element in a [`MemoryDocument`].
///
/// Handles stay valid after the element is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Page Fixture
// =============================================================================

/// Serialized element tree, as stored in a page fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageNode {
    /// Tag name.
    pub tag: String,

    /// Attributes.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,

    /// Current value for input elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Inline background colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Child elements.
    #[serde(default)]
    pub children: Vec<PageNode>,
}

// =============================================================================
// Memory Document
// =============================================================================

#[derive(Debug)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    background: Option<String>,
    value: String,
    selection: (usize, usize),
}

/// Mutable element tree.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    /// Top-level elements in document order.
    top: Vec<NodeId>,
    focused: Option<NodeId>,
    scrolled_to: Option<NodeId>,
    /// URL of the page itself, used to resolve relative link targets.
    base_url: Option<String>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document whose single top-level element is `page`.
    pub fn from_page(page: &PageNode) -> Self {
        let mut doc = Self::new();
        doc.load_node(None, page);
        doc
    }

    /// Parse a JSON page fixture.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let page: PageNode =
            serde_json::from_str(json).map_err(|e| EngineError::Fixture(e.to_string()))?;
        Ok(Self::from_page(&page))
    }

    fn load_node(&mut self, parent: Option<NodeId>, page: &PageNode) {
        let id = self.create(parent, &page.tag, page.attrs.clone());
        self.attach(parent, id, usize::MAX);

        let node = &mut self.nodes[id.0];
        node.background = page.style.clone();
        if let Some(value) = &page.value {
            node.value = value.clone();
        }

        for child in &page.children {
            self.load_node(Some(id), child);
        }
    }

    /// Append a new element as the last child of `parent` (or as a top-level
    /// element when `parent` is `None`).
    pub fn append(&mut self, parent: Option<NodeId>, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        self.insert(parent, usize::MAX, tag, attrs)
    }

    /// Insert a new element at `index` among `parent`'s children. Indices past
    /// the end append.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        index: usize,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let id = self.create(parent, tag, attrs);
        self.attach(parent, id, index);
        id
    }

    fn create(&mut self, parent: Option<NodeId>, tag: &str, attrs: BTreeMap<String, String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_string(),
            attrs,
            parent,
            children: Vec::new(),
            background: None,
            value: String::new(),
            selection: (0, 0),
        });
        id
    }

    fn attach(&mut self, parent: Option<NodeId>, id: NodeId, index: usize) {
        let siblings = match parent {
            Some(p) => &mut self.nodes[p.0].children,
            None => &mut self.top,
        };
        let index = index.min(siblings.len());
        siblings.insert(index, id);
    }

    /// Remove `id` (and its subtree) from the tree.
    pub fn detach(&mut self, id: NodeId) {
        let parent = self.nodes[id.0].parent.take();
        let siblings = match parent {
            Some(p) => &mut self.nodes[p.0].children,
            None => &mut self.top,
        };
        siblings.retain(|&child| child != id);
    }

    /// Set the page URL that relative link targets resolve against.
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = Some(url.to_string());
    }

    /// Page URL, if known.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Set or replace an attribute.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        self.nodes[id.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    /// Current value of an input element.
    pub fn value(&self, id: NodeId) -> &str {
        &self.nodes[id.0].value
    }

    /// Replace the value of an input element, collapsing its selection to the end.
    pub fn set_value(&mut self, id: NodeId, value: &str) {
        let node = &mut self.nodes[id.0];
        node.value = value.to_string();
        let len = node.value.chars().count();
        node.selection = (len, len);
    }

    /// Current selection range of an input element.
    pub fn selection(&self, id: NodeId) -> (usize, usize) {
        self.nodes[id.0].selection
    }

    /// Element holding input focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Element last scrolled into view.
    pub fn scrolled_to(&self) -> Option<NodeId> {
        self.scrolled_to
    }

    /// Total number of elements ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attached elements in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: self.top.iter().rev().copied().collect(),
        }
    }
}

// =============================================================================
// Link Resolution
// =============================================================================

/// Whether `href` starts with a URL scheme (`https:`, `mailto:`, ...).
fn has_scheme(href: &str) -> bool {
    match href.find(':') {
        Some(end) => {
            let scheme = &href[..end];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Resolve `href` against `base` the way a browser builds `a.href`.
///
/// Dot segments (`../`) are kept as written. A base without a scheme leaves
/// `href` untouched.
fn resolve_href<'a>(base: &str, href: &'a str) -> Cow<'a, str> {
    if has_scheme(href) {
        return Cow::Borrowed(href);
    }
    let Some((scheme, rest)) = base.split_once("://") else {
        return Cow::Borrowed(href);
    };

    let authority_end = rest.find(&['/', '?', '#'][..]).unwrap_or(rest.len());
    let origin = &base[..scheme.len() + 3 + authority_end];
    let without_fragment = base.split('#').next().unwrap_or(base);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);

    let resolved = if href.starts_with("//") {
        format!("{}:{}", scheme, href)
    } else if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else if href.starts_with('?') {
        format!("{}{}", without_query, href)
    } else if href.starts_with('#') {
        format!("{}{}", without_fragment, href)
    } else if without_query.len() > origin.len() {
        let dir_end = without_query.rfind('/').map_or(without_query.len(), |i| i + 1);
        format!("{}{}", &without_query[..dir_end], href)
    } else {
        format!("{}/{}", origin, href)
    };
    Cow::Owned(resolved)
}

/// Pre-order walk over attached elements.
pub struct Descendants<'a> {
    doc: &'a MemoryDocument,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.nodes[id.0].children.iter().rev().copied());
        Some(id)
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn select<'a>(&'a self, path: &'a PathExpr) -> Box<dyn Iterator<Item = NodeId> + 'a> {
        Box::new(self.descendants().filter(move |id| path.matches(self, id)))
    }

    fn parent(&self, el: &NodeId) -> Option<NodeId> {
        self.nodes[el.0].parent
    }

    fn tag_name(&self, el: &NodeId) -> &str {
        &self.nodes[el.0].tag
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<&str> {
        self.nodes[el.0].attrs.get(name).map(String::as_str)
    }

    fn background(&self, el: &NodeId) -> Option<String> {
        self.nodes[el.0].background.clone()
    }

    fn set_background(&mut self, el: &NodeId, value: Option<String>) {
        self.nodes[el.0].background = value;
    }

    fn focus(&mut self, el: &NodeId) {
        self.focused = Some(*el);
    }

    fn href(&self, el: &NodeId) -> Option<Cow<'_, str>> {
        let raw = self.attribute(el, "href").filter(|href| !href.is_empty())?;
        Some(match &self.base_url {
            Some(base) => resolve_href(base, raw),
            None => Cow::Borrowed(raw),
        })
    }
}

impl FormDocument for MemoryDocument {
    fn value_len(&self, el: &NodeId) -> usize {
        self.nodes[el.0].value.chars().count()
    }

    fn set_selection_range(&mut self, el: &NodeId, start: usize, end: usize) {
        let len = self.value_len(el);
        let end = end.min(len);
        self.nodes[el.0].selection = (start.min(end), end);
    }

    fn scroll_into_view(&mut self, el: &NodeId) {
        self.scrolled_to = Some(*el);
    }
}
