//! Error types for the navigation engine.

use thiserror::Error;

/// Errors raised while building the engine from configuration.
///
/// Navigation itself never fails: a missing result, field or link target
/// degrades to a no-op.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Path expression could not be parsed.
    #[error("Invalid path '{path}' at position {position}: {message}")]
    InvalidPath {
        path: String,
        position: usize,
        message: String,
    },

    /// Keybinding refers to an action that does not exist.
    #[error("Unknown action '{action}' bound to key '{key}'")]
    UnknownAction { key: String, action: String },

    /// Page fixture could not be read.
    #[error("Page fixture error: {0}")]
    Fixture(String),
}

/// Result type for engine construction.
pub type EngineResult<T> = Result<T, EngineError>;
