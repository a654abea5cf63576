//! Engine configuration.
//!
//! Loaded from YAML or environment variables; every field has a default so
//! an empty document is a valid configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! locator: balanced          # or last_brace
//! default_palette: ["#0088FE", "#00C49F"]
//! max_series_len: 500
//! history_capacity: 50
//! ```
//!
//! # Environment Variables
//!
//! - `DIRECTIVE_LOCATOR`: `balanced` (default) or `last_brace`
//! - `DIRECTIVE_PALETTE`: comma-separated colour tokens
//! - `DIRECTIVE_MAX_SERIES`: maximum records per directive
//! - `DIRECTIVE_HISTORY_CAPACITY`: transcript entries retained (default: 100)

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::directive::palette::DEFAULT_COLORS;
use crate::directive::Palette;
use crate::extractor::LocatorKind;

const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Errors raised while loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An environment variable held an unusable value.
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    /// A loaded value breaks an invariant.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Settings for [`crate::pipeline::DirectiveEngine`] and
/// [`crate::transcript::Transcript`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Trailing-object locator used when no fenced block is present.
    pub locator: LocatorKind,
    /// Colours used when a directive carries none.
    pub default_palette: Vec<String>,
    /// Directives with more records than this are rejected.
    pub max_series_len: Option<usize>,
    /// Maximum transcript entries kept before the oldest is evicted.
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locator: LocatorKind::default(),
            default_palette: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            max_series_len: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from a YAML file on disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from environment variables, keeping defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("DIRECTIVE_LOCATOR") {
            config.locator = LocatorKind::parse(&value).ok_or(ConfigError::InvalidEnv {
                var: "DIRECTIVE_LOCATOR",
                value,
            })?;
        }
        if let Some(value) = lookup("DIRECTIVE_PALETTE") {
            config.default_palette = value
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(value) = lookup("DIRECTIVE_MAX_SERIES") {
            config.max_series_len = Some(parse_count("DIRECTIVE_MAX_SERIES", value)?);
        }
        if let Some(value) = lookup("DIRECTIVE_HISTORY_CAPACITY") {
            config.history_capacity = parse_count("DIRECTIVE_HISTORY_CAPACITY", value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants: non-empty palette, positive limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_palette.iter().all(|c| c.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "default_palette must contain at least one colour".into(),
            ));
        }
        if self.max_series_len == Some(0) {
            return Err(ConfigError::Validation("max_series_len must be positive".into()));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Validation("history_capacity must be positive".into()));
        }
        Ok(())
    }

    /// The default palette as a [`Palette`].
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let colors = self
            .default_palette
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty());
        Palette::new(colors).map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

fn parse_count(var: &'static str, value: String) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) => Ok(n),
        Err(_) => Err(ConfigError::InvalidEnv { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.locator, LocatorKind::Balanced);
        assert_eq!(config.default_palette.len(), 6);
        assert_eq!(config.max_series_len, None);
        assert_eq!(config.history_capacity, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = EngineConfig::from_yaml("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r##"
locator: last_brace
default_palette: ["#111111", "#222222"]
max_series_len: 10
"##;
        let config = EngineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.locator, LocatorKind::LastBrace);
        assert_eq!(config.palette().unwrap().len(), 2);
        assert_eq!(config.max_series_len, Some(10));
        assert_eq!(config.history_capacity, 100);
    }

    #[test]
    fn test_yaml_rejects_empty_palette() {
        let result = EngineConfig::from_yaml("default_palette: []");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_yaml_rejects_unknown_locator() {
        let result = EngineConfig::from_yaml("locator: regex");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "history_capacity: 3").unwrap();
        let config = EngineConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.history_capacity, 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = EngineConfig::from_yaml_file("/nonexistent/directives.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_from_lookup() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("DIRECTIVE_LOCATOR", "last_brace"),
            ("DIRECTIVE_PALETTE", "red, green ,,blue"),
            ("DIRECTIVE_MAX_SERIES", "200"),
            ("DIRECTIVE_HISTORY_CAPACITY", "5"),
        ]))
        .unwrap();
        assert_eq!(config.locator, LocatorKind::LastBrace);
        assert_eq!(config.default_palette, vec!["red", "green", "blue"]);
        assert_eq!(config.max_series_len, Some(200));
        assert_eq!(config.history_capacity, 5);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let result = EngineConfig::from_lookup(lookup(&[("DIRECTIVE_MAX_SERIES", "lots")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnv { var: "DIRECTIVE_MAX_SERIES", .. })
        ));

        let result = EngineConfig::from_lookup(lookup(&[("DIRECTIVE_HISTORY_CAPACITY", "0")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        let result = EngineConfig::from_lookup(lookup(&[("DIRECTIVE_PALETTE", " , ")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
