//! Query field editing.
//!
//! Independent of the result cursor: finds the search input, places the caret
//! or selection, and hands it input focus.

use hop_core::CaretEdit;

use crate::document::FormDocument;
use crate::path::PathExpr;

/// Locates and edits the search query input.
#[derive(Debug, Clone)]
pub struct QueryFieldEditor {
    path: PathExpr,
}

impl QueryFieldEditor {
    pub fn new(path: PathExpr) -> Self {
        Self { path }
    }

    /// Apply `edit` to the first matching field.
    ///
    /// Returns `false` without touching the page when no field matches.
    pub fn edit<D: FormDocument>(&self, doc: &mut D, edit: CaretEdit) -> bool {
        let Some(field) = doc.select(&self.path).next() else {
            tracing::debug!(path = %self.path, "query field not found");
            return false;
        };

        let (start, end) = edit.range(doc.value_len(&field));
        doc.set_selection_range(&field, start, end);
        doc.scroll_into_view(&field);
        doc.focus(&field);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    fn editor() -> QueryFieldEditor {
        QueryFieldEditor::new(PathExpr::parse("//textarea[@name='q']").unwrap())
    }

    #[test]
    fn test_edits_move_caret_and_focus() {
        let mut doc = MemoryDocument::new();
        let form = doc.append(None, "form", &[]);
        let field = doc.append(Some(form), "textarea", &[("name", "q")]);
        doc.set_value(field, "rust iterators");

        assert!(editor().edit(&mut doc, CaretEdit::InsertAtStart));
        assert_eq!(doc.selection(field), (0, 0));
        assert_eq!(doc.focused(), Some(field));
        assert_eq!(doc.scrolled_to(), Some(field));

        assert!(editor().edit(&mut doc, CaretEdit::SelectAll));
        assert_eq!(doc.selection(field), (0, 14));

        assert!(editor().edit(&mut doc, CaretEdit::AppendToEnd));
        assert_eq!(doc.selection(field), (14, 14));
    }

    #[test]
    fn test_missing_field_is_skipped() {
        let mut doc = MemoryDocument::new();
        doc.append(None, "textarea", &[("name", "other")]);

        assert!(!editor().edit(&mut doc, CaretEdit::SelectAll));
        assert_eq!(doc.focused(), None);
        assert_eq!(doc.scrolled_to(), None);
    }
}
