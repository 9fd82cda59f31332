//! Shared page fixtures for unit tests.

use crate::dom::{MemoryDocument, NodeId};

pub(crate) struct Page {
    pub doc: MemoryDocument,
    pub body: NodeId,
    pub links: Vec<NodeId>,
}

/// Append one result block (`div.yuRUbf > a[href]`) under `parent`.
pub(crate) fn add_result(doc: &mut MemoryDocument, parent: NodeId, href: &str) -> NodeId {
    let result = doc.append(Some(parent), "div", &[("class", "yuRUbf")]);
    doc.append(Some(result), "a", &[("href", href)])
}

/// Six result links; the last one sits inside a secondary-topic panel whose
/// marker is three levels below the panel container.
pub(crate) fn scenario_page() -> Page {
    let mut doc = MemoryDocument::new();
    let body = doc.append(None, "body", &[]);
    let mut links = Vec::new();

    for i in 0..5 {
        links.push(add_result(&mut doc, body, &format!("https://r{}.example/", i)));
    }

    let panel = doc.append(Some(body), "div", &[]);
    let a = doc.append(Some(panel), "div", &[]);
    let b = doc.append(Some(a), "div", &[]);
    doc.append(Some(b), "div", &[("aria-level", "2")]);
    links.push(add_result(&mut doc, a, "https://r5.example/"));

    Page { doc, body, links }
}

/// `count` plain results and nothing else.
pub(crate) fn plain_page(count: usize) -> Page {
    let mut doc = MemoryDocument::new();
    let body = doc.append(None, "body", &[]);
    let links = (0..count)
        .map(|i| add_result(&mut doc, body, &format!("https://p{}.example/", i)))
        .collect();
    Page { doc, body, links }
}
