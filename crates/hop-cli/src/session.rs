//! Key replay session.
//!
//! Drives an [`ActionDispatch`] over an in-memory page and records what each
//! key did, standing in for the browser's tab and click plumbing.

use serde::Serialize;

use hop_core::HopConfig;
use hop_engine::{
    ActionDispatch, ActivationTarget, Document, MemoryDocument, Navigator, NodeId, Outcome,
};

use crate::error::CliError;

// =============================================================================
// Recorders
// =============================================================================

/// A navigation request made by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "snake_case")]
pub enum Navigation {
    NewTab(String),
    Redirect(String),
}

/// Records navigation requests instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub requests: Vec<Navigation>,
}

impl Navigator for RecordingNavigator {
    fn open_in_new_tab(&mut self, url: &str) {
        self.requests.push(Navigation::NewTab(url.to_string()));
    }

    fn redirect(&mut self, url: &str) {
        self.requests.push(Navigation::Redirect(url.to_string()));
    }
}

/// Records activated elements.
#[derive(Debug, Default)]
pub struct ClickRecorder {
    pub clicked: Vec<NodeId>,
}

impl ActivationTarget<NodeId> for ClickRecorder {
    fn activate(&mut self, element: &NodeId) {
        self.clicked.push(*element);
    }
}

// =============================================================================
// Report
// =============================================================================

/// Cursor position after one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Key pressed; `None` for the initial focus at startup.
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub index: isize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Everything a replay did.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub steps: Vec<Step>,
    pub candidates: Vec<String>,
    pub navigations: Vec<Navigation>,
    pub activated: Vec<String>,
}

impl Report {
    /// Human-readable rendering, one line per step.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let key = step.key.as_deref().unwrap_or("(start)");
            let outcome = step
                .outcome
                .map(|o| format!("{:?}", o).to_lowercase())
                .unwrap_or_else(|| "focus".to_string());
            out.push_str(&format!(
                "{:<8} {:<10} [{}] {}\n",
                key,
                outcome,
                step.index,
                step.href.as_deref().unwrap_or("-")
            ));
        }
        for navigation in &self.navigations {
            match navigation {
                Navigation::NewTab(url) => out.push_str(&format!("open {}\n", url)),
                Navigation::Redirect(url) => out.push_str(&format!("redirect {}\n", url)),
            }
        }
        for element in &self.activated {
            out.push_str(&format!("activate {}\n", element));
        }
        out
    }
}

// =============================================================================
// Replay
// =============================================================================

type Dispatch = ActionDispatch<NodeId, RecordingNavigator, ClickRecorder>;

fn snapshot(doc: &MemoryDocument, hop: &Dispatch, key: Option<&str>, outcome: Option<Outcome>) -> Step {
    let controller = hop.controller();
    Step {
        key: key.map(str::to_string),
        outcome,
        index: controller.index(),
        href: controller
            .focused()
            .and_then(|el| doc.href(el))
            .map(|href| href.into_owned()),
    }
}

/// Start navigation on `doc` and press each key in `keys` (whitespace separated).
pub fn replay(doc: &mut MemoryDocument, config: &HopConfig, keys: &str) -> Result<Report, CliError> {
    let mut hop = ActionDispatch::start(
        doc,
        config,
        RecordingNavigator::default(),
        ClickRecorder::default(),
    )?;

    let mut steps = vec![snapshot(doc, &hop, None, None)];
    for key in keys.split_whitespace() {
        let outcome = hop.handle_key(doc, key);
        steps.push(snapshot(doc, &hop, Some(key), Some(outcome)));
    }

    let candidates = hop
        .controller()
        .results()
        .candidates()
        .iter()
        .map(|el| doc.href(el).unwrap_or_default().to_string())
        .collect();

    Ok(Report {
        steps,
        candidates,
        navigations: hop.navigator().requests.clone(),
        activated: hop
            .activator()
            .clicked
            .iter()
            .map(ToString::to_string)
            .collect(),
    })
}
