//! Result navigation engine for Hop.
//!
//! This crate provides keyboard navigation over a search-results page:
//! - Path expressions and the query engine over a live document
//! - Secondary-topic exclusion
//! - The result collection and its focus cursor
//! - Keymap registry and action dispatch
//! - An in-memory document for fixtures and tests

pub mod collection;
pub mod cursor;
pub mod dispatch;
pub mod document;
pub mod dom;
pub mod error;
pub mod exclusion;
pub mod field;
pub mod keymap;
pub mod path;
pub mod query;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use collection::ResultCollection;
pub use cursor::{refresh_size, CursorState, FocusedNode, NavigationController};
pub use dispatch::{ActionDispatch, ActivationTarget, Navigator, Outcome};
pub use document::{Document, FormDocument};
pub use dom::{MemoryDocument, NodeId, PageNode};
pub use error::{EngineError, EngineResult};
pub use exclusion::{ExclusionFilter, ExclusionResolver, ExclusionSet};
pub use field::QueryFieldEditor;
pub use keymap::{normalize_key, KeymapRegistry, DEFAULT_BINDINGS};
pub use path::PathExpr;
pub use query::{query, QueryWindow};

// Re-export hop_core types for convenience
pub use hop_core::{CaretEdit, HopConfig, NavAction};
