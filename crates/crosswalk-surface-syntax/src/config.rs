//! Conversion configuration.
//!
//! Every field has a default, so an empty file is a valid config.
//!
//! Example `crosswalk.toml`:
//! ```toml
//! [adapter]
//! on_unsupported = "placeholder"
//! duplicate_parameters = "preserve"
//!
//! [render]
//! indent_width = 2
//! terminate_statements = true
//! ```

use serde::Deserialize;
use std::path::Path;

/// What the reader does with a construct it cannot map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedPolicy {
    /// Stop and return the construct to the caller.
    #[default]
    Error,
    /// Substitute a literal placeholder, record a diagnostic, keep going.
    Placeholder,
}

/// How parameters declared twice (in the signature and in `param()`) are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateParameters {
    /// Keep every declaration in source order.
    Preserve,
    /// Keep only the last declaration of each name (case-insensitive).
    #[default]
    LastWins,
}

/// Reader configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdapterOptions {
    pub on_unsupported: UnsupportedPolicy,
    pub duplicate_parameters: DuplicateParameters,
}

/// Writer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Override the target language's statement terminator convention.
    pub terminate_statements: Option<bool>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            terminate_statements: None,
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub adapter: AdapterOptions,
    pub render: RenderOptions,
}

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConvertConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ConvertConfig::from_toml_str("").unwrap();
        assert_eq!(config, ConvertConfig::default());
        assert_eq!(config.adapter.on_unsupported, UnsupportedPolicy::Error);
        assert_eq!(config.adapter.duplicate_parameters, DuplicateParameters::LastWins);
        assert_eq!(config.render.indent_width, 4);
        assert_eq!(config.render.terminate_statements, None);
    }

    #[test]
    fn test_partial_sections() {
        let config = ConvertConfig::from_toml_str(
            r#"
[adapter]
on_unsupported = "placeholder"

[render]
indent_width = 2
"#,
        )
        .unwrap();

        assert_eq!(config.adapter.on_unsupported, UnsupportedPolicy::Placeholder);
        assert_eq!(config.adapter.duplicate_parameters, DuplicateParameters::LastWins);
        assert_eq!(config.render.indent_width, 2);
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let err = ConvertConfig::from_toml_str("[adapter]\non_unsupported = \"ignore\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nterminate_statements = false").unwrap();

        let config = ConvertConfig::load(file.path()).unwrap();
        assert_eq!(config.render.terminate_statements, Some(false));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConvertConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
