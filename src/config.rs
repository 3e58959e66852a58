//! Configuration for partial lookup and path resolution

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration options for the partial renderer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Ordered search prefixes; the first is the current search prefix
    pub prefixes: Vec<String>,

    /// Extensions tried after the bare template name, by lookups built with
    /// `InMemoryLookup::from_config` or `FileSystemLookup::from_config`
    pub extensions: Vec<String>,

    /// Qualify object-derived paths with the directory of the current prefix
    pub namespace_object_paths: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            prefixes: Vec::new(),
            extensions: vec!["html".to_string()],
            namespace_object_paths: true,
        }
    }
}

impl RendererConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the search prefixes
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the template extensions
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable namespace qualification of object paths
    pub fn with_namespace_object_paths(mut self, enabled: bool) -> Self {
        self.namespace_object_paths = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RendererConfig::default();
        assert!(config.prefixes.is_empty());
        assert_eq!(config.extensions, vec!["html".to_string()]);
        assert!(config.namespace_object_paths);
    }

    #[test]
    fn test_builder_pattern() {
        let config = RendererConfig::new()
            .with_prefixes(["admin/users", "application"])
            .with_extensions(["html", "txt"])
            .with_namespace_object_paths(false);

        assert_eq!(config.prefixes, vec!["admin/users", "application"]);
        assert_eq!(config.extensions, vec!["html", "txt"]);
        assert!(!config.namespace_object_paths);
    }

    #[test]
    fn test_from_toml_fills_defaults() {
        let config = RendererConfig::from_str(r#"prefixes = ["users"]"#).expect("valid config");
        assert_eq!(config.prefixes, vec!["users"]);
        assert_eq!(config.extensions, vec!["html"]);
        assert!(config.namespace_object_paths);
    }

    #[test]
    fn test_from_toml_rejects_bad_types() {
        let result = RendererConfig::from_str("prefixes = 3");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
