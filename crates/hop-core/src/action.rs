//! Navigation actions.
//!
//! Actions are the named input events the key-binding layer produces.
//! Each one maps to exactly one cursor move, link activation or query-field edit.

use serde::{Deserialize, Serialize};

/// A discrete navigation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavAction {
    /// Focus the first result.
    Home,
    /// Focus the next result, fetching more if needed.
    Down,
    /// Focus the previous result.
    Up,
    /// Open the focused link in a new tab.
    OpenInNewTab,
    /// Open the focused link in the current tab.
    OpenHere,
    /// Activate (click) the focused element.
    Activate,
    /// Edit the query field with the caret at the end.
    AppendToQuery,
    /// Edit the query field with the caret at the start.
    InsertAtQueryStart,
    /// Select the whole query.
    SelectQuery,
}

impl NavAction {
    /// Look up an action by its binding name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            // Cursor
            "home" => Some(Self::Home),
            "down" => Some(Self::Down),
            "up" => Some(Self::Up),

            // Links
            "open_in_new_tab" => Some(Self::OpenInNewTab),
            "open_here" => Some(Self::OpenHere),
            "activate" => Some(Self::Activate),

            // Query field
            "append_to_query" => Some(Self::AppendToQuery),
            "insert_at_query_start" => Some(Self::InsertAtQueryStart),
            "select_query" => Some(Self::SelectQuery),

            _ => None,
        }
    }

    /// The binding name of this action.
    pub fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Down => "down",
            Self::Up => "up",
            Self::OpenInNewTab => "open_in_new_tab",
            Self::OpenHere => "open_here",
            Self::Activate => "activate",
            Self::AppendToQuery => "append_to_query",
            Self::InsertAtQueryStart => "insert_at_query_start",
            Self::SelectQuery => "select_query",
        }
    }
}

/// Get all available action names.
pub fn available_actions() -> &'static [&'static str] {
    &[
        "home",
        "down",
        "up",
        "open_in_new_tab",
        "open_here",
        "activate",
        "append_to_query",
        "insert_at_query_start",
        "select_query",
    ]
}

/// Caret placement applied to the query field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaretEdit {
    /// Collapse the selection at the end of the text.
    AppendToEnd,
    /// Collapse the selection at the start of the text.
    InsertAtStart,
    /// Select the whole text.
    SelectAll,
}

impl CaretEdit {
    /// Selection range `(start, end)` for a field holding `len` characters.
    pub fn range(self, len: usize) -> (usize, usize) {
        match self {
            Self::AppendToEnd => (len, len),
            Self::InsertAtStart => (0, 0),
            Self::SelectAll => (0, len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_name() {
        assert_eq!(NavAction::from_name("down"), Some(NavAction::Down));
        assert_eq!(NavAction::from_name("select_query"), Some(NavAction::SelectQuery));
        assert!(NavAction::from_name("unknown_action").is_none());
    }

    #[test]
    fn test_available_actions_resolve() {
        for name in available_actions() {
            let action = NavAction::from_name(name).unwrap();
            assert_eq!(action.name(), *name);
        }
    }

    #[test]
    fn test_caret_edit_ranges() {
        assert_eq!(CaretEdit::AppendToEnd.range(7), (7, 7));
        assert_eq!(CaretEdit::InsertAtStart.range(7), (0, 0));
        assert_eq!(CaretEdit::SelectAll.range(7), (0, 7));
    }
}
