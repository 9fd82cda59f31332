//! CLI errors.

use std::path::PathBuf;
use thiserror::Error;

use hop_core::ConfigError;
use hop_engine::EngineError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Config file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Config values the engine cannot use, or a bad page fixture.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Page fixture could not be read.
    #[error("Failed to read page {}: {source}", .path.display())]
    ReadPage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report could not be serialized.
    #[error("Failed to write report: {0}")]
    Report(#[from] serde_json::Error),
}
