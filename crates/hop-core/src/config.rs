//! Configuration types.
//!
//! Configuration lives in `<config dir>/hop/config.toml`. Every field has a
//! default matching the Google results page, so an absent file or an empty
//! table is a valid configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Runtime configuration loaded from config.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HopConfig {
    /// Which links count as results.
    #[serde(default)]
    pub results: ResultsConfig,

    /// Secondary-topic panels whose links are skipped.
    #[serde(default)]
    pub exclusion: ExclusionConfig,

    /// How far a refresh over-fetches.
    #[serde(default)]
    pub growth: GrowthConfig,

    /// Appearance settings
    #[serde(default)]
    pub appearance: AppearanceConfig,

    /// The search query input.
    #[serde(default)]
    pub query_field: QueryFieldConfig,

    /// User keybindings, key -> action name. `"none"` removes a default binding.
    #[serde(default)]
    pub keymap: BTreeMap<String, String>,
}

/// Result link selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    /// Path expression matching result links.
    pub path: String,

    /// Link targets starting with any of these prefixes are never results.
    pub excluded_targets: Vec<String>,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            path: "//div[@class='yuRUbf']//a[@href]".to_string(),
            excluded_targets: vec!["https://translate.google.com/".to_string()],
        }
    }
}

/// Secondary-topic exclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionConfig {
    /// Path expression matching secondary-topic markers.
    pub marker_path: String,

    /// Number of parent levels between a marker and its panel container.
    pub depth: usize,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            marker_path: "//div[@aria-level='2']".to_string(),
            depth: 3,
        }
    }
}

/// Candidate list growth policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Requested index is multiplied by this.
    pub factor: usize,

    /// Minimum refresh size.
    pub floor: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            factor: 2,
            floor: 5,
        }
    }
}

/// Appearance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Background colour of the focused result.
    pub highlight: String,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            highlight: "#fcff5c".to_string(),
        }
    }
}

/// Query input location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFieldConfig {
    /// Path expression matching the query input.
    pub path: String,
}

impl Default for QueryFieldConfig {
    fn default() -> Self {
        Self {
            path: "//textarea[@name='q']".to_string(),
        }
    }
}

impl HopConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Load configuration from a file, falling back to defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject values that parse but cannot drive navigation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.growth.factor == 0 {
            return Err(ConfigError::InvalidValue {
                key: "growth.factor".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.appearance.highlight.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "appearance.highlight".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hop"))
}

/// Get the path to config.toml.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    config_dir()
        .map(|p| p.join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = HopConfig::default();
        assert_eq!(config.exclusion.depth, 3);
        assert_eq!(config.growth.factor, 2);
        assert_eq!(config.growth.floor, 5);
        assert_eq!(config.appearance.highlight, "#fcff5c");
        assert!(config.keymap.is_empty());
    }

    #[test]
    fn test_partial_tables_keep_defaults() {
        let config = HopConfig::from_toml(
            r#"
            [exclusion]
            depth = 4

            [keymap]
            n = "down"
            "#,
        )
        .unwrap();

        assert_eq!(config.exclusion.depth, 4);
        assert_eq!(config.exclusion.marker_path, "//div[@aria-level='2']");
        assert_eq!(config.results, ResultsConfig::default());
        assert_eq!(config.keymap.get("n").map(String::as_str), Some("down"));
    }

    #[test]
    fn test_zero_growth_factor_rejected() {
        let err = HopConfig::from_toml("[growth]\nfactor = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "growth.factor"));
    }

    #[test]
    fn test_parse_error() {
        let err = HopConfig::from_toml("[growth\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[appearance]\nhighlight = \"#00ff00\"").unwrap();

        let config = HopConfig::load(file.path()).unwrap();
        assert_eq!(config.appearance.highlight, "#00ff00");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = HopConfig::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, HopConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = HopConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
