//! Hop - keyboard navigation over search-result pages.
//!
//! Loads a page fixture and the user's config, focuses the first result, then
//! replays a sequence of key presses and reports what each one did.

mod error;
mod session;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use hop_core::{config_path, ConfigError, HopConfig};
use hop_engine::{KeymapRegistry, MemoryDocument};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "hop")]
#[command(about = "Keyboard navigation over search-result pages", long_about = None)]
struct Cli {
    /// Page fixture (JSON element tree)
    #[arg(long, required_unless_present = "list_bindings")]
    page: Option<PathBuf>,

    /// URL of the page, for resolving relative links
    #[arg(long)]
    base_url: Option<String>,

    /// Config file (default: <config dir>/hop/config.toml)
    #[arg(long, env = "HOP_CONFIG")]
    config: Option<PathBuf>,

    /// Keys to press, separated by whitespace (e.g. "j j l")
    #[arg(short, long, default_value = "")]
    keys: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Print the effective key bindings and exit
    #[arg(long)]
    list_bindings: bool,
}

// =============================================================================
// Configuration
// =============================================================================

/// Load the explicit config file, or the default one if it exists.
fn load_config(explicit: Option<&Path>) -> Result<HopConfig, ConfigError> {
    if let Some(path) = explicit {
        tracing::info!("Loading config from {}", path.display());
        return HopConfig::load(path);
    }

    match config_path() {
        Ok(path) => HopConfig::load_or_default(&path),
        Err(ConfigError::NoConfigDir) => {
            tracing::warn!("No config directory, using defaults");
            Ok(HopConfig::default())
        }
        Err(e) => Err(e),
    }
}

fn load_page(path: &Path) -> Result<MemoryDocument, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::ReadPage {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(MemoryDocument::from_json(&json)?)
}

// =============================================================================
// Commands
// =============================================================================

fn list_bindings(config: &HopConfig) -> Result<String, CliError> {
    let keymap = KeymapRegistry::with_defaults();
    keymap.apply_config(&config.keymap)?;

    let mut out = String::new();
    for (key, action) in keymap.bindings() {
        out.push_str(&format!("{:<10} {}\n", key, action.name()));
    }
    Ok(out)
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let config = load_config(cli.config.as_deref())?;

    if cli.list_bindings {
        return list_bindings(&config);
    }

    // Guaranteed by clap's `required_unless_present`.
    let Some(page) = cli.page.as_deref() else {
        return Ok(String::new());
    };

    let mut doc = load_page(page)?;
    if let Some(url) = &cli.base_url {
        doc.set_base_url(url);
    }
    let report = session::replay(&mut doc, &config, &cli.keys)?;

    if cli.json {
        Ok(serde_json::to_string_pretty(&report)? + "\n")
    } else {
        Ok(report.to_text())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    finish(run(&cli), &mut std::io::stdout(), &mut std::io::stderr())
}

/// Write the command output, or the error once, and pick the exit code.
fn finish(result: Result<String, CliError>, out: &mut dyn Write, err: &mut dyn Write) -> ExitCode {
    match result {
        Ok(output) => {
            let _ = out.write_all(output.as_bytes());
            ExitCode::SUCCESS
        }
        Err(e) => {
            let _ = writeln!(err, "hop: {}", e);
            ExitCode::FAILURE
        }
    }
}
