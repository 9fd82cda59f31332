//! Error types for Hop configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error reading {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value that parses but cannot be used.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
