//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `elm-webcomponents.toml`
//! and turning it into a [`GeneratorConfig`].

use crate::error::{CliResult, ConfigError};
use elm_webcomponents::generator::elm::naming::{is_lower_identifier, is_module_name};
use elm_webcomponents::generator::{
    DEFAULT_COMPONENT_ANNOTATION, DEFAULT_PROPERTY_ANNOTATION, DEFAULT_VIEW_FUNCTION,
};
use elm_webcomponents::GeneratorConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "elm-webcomponents.toml";

/// Environment variable that points at a configuration file.
pub const CONFIG_ENV: &str = "ELM_WEBCOMPONENTS_CONFIG";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Generated code options.
    pub generation: GenerationConfig,

    /// Decorator names.
    pub annotations: AnnotationsConfig,
}

/// Output configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory modules are written to. Modules go to stdout when unset.
    pub dir: Option<PathBuf>,

    /// Prefix for every module name, e.g. `Components.`.
    pub module_prefix: String,
}

/// Generated code options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Name of the view function.
    pub view_function: String,
}

/// Decorator names that mark components and their properties.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnnotationsConfig {
    /// Class decorator carrying the tag name.
    pub component: String,

    /// Member decorator marking a property.
    pub property: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            view_function: DEFAULT_VIEW_FUNCTION.to_string(),
        }
    }
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        Self {
            component: DEFAULT_COMPONENT_ANNOTATION.to_string(),
            property: DEFAULT_PROPERTY_ANNOTATION.to_string(),
        }
    }
}

impl Config {
    /// Check values the generator relies on.
    pub fn validate(&self) -> CliResult<()> {
        if !is_lower_identifier(&self.generation.view_function) {
            return Err(ConfigError::invalid_value(
                "generation.view_function",
                format!(
                    "'{}' is not a lowercase Elm identifier",
                    self.generation.view_function
                ),
            )
            .into());
        }

        let prefix = self.output.module_prefix.trim_end_matches('.');
        if !prefix.is_empty() && !is_module_name(prefix) {
            return Err(ConfigError::invalid_value(
                "output.module_prefix",
                format!("'{}' is not an Elm module name", self.output.module_prefix),
            )
            .into());
        }

        for (key, value) in [
            ("annotations.component", &self.annotations.component),
            ("annotations.property", &self.annotations.property),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid_value(key, "must not be empty").into());
            }
        }

        Ok(())
    }

    /// Generator settings derived from this configuration.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .with_component_annotation(self.annotations.component.clone())
            .with_property_annotation(self.annotations.property.clone())
            .with_view_function(self.generation.view_function.clone())
            .with_module_prefix(self.output.module_prefix.clone())
    }
}

/// Configuration manager for locating and loading configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, the default location is tried and a missing file
    /// yields the default configuration. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::not_found(path.to_path_buf()).into())
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the path named by [`CONFIG_ENV`], falling back
    /// to the default location.
    pub fn load_from_env() -> CliResult<Config> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(Some(Path::new(&path))),
            _ => Self::load(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.dir, None);
        assert_eq!(config.output.module_prefix, "");
        assert_eq!(config.generation.view_function, "view");
        assert_eq!(config.annotations.component, "component");
        assert_eq!(config.annotations.property, "api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[output]
dir = "src/Generated"
module_prefix = "Generated."

[generation]
view_function = "node"

[annotations]
component = "customElement"
property = "prop"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.output.dir, Some(PathBuf::from("src/Generated")));
        assert_eq!(config.output.module_prefix, "Generated.");
        assert_eq!(config.generation.view_function, "node");
        assert_eq!(config.annotations.component, "customElement");
        assert_eq!(config.annotations.property, "prop");

        let generator = config.generator_config();
        assert_eq!(generator.module_name("MyElement"), "Generated.MyElement");
        assert_eq!(generator.property_annotation, "prop");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[output]\nmodule_prefix = \"Ui\"\n").unwrap();
        assert_eq!(config.output.dir, None);
        assert_eq!(config.generation.view_function, "view");
        assert_eq!(config.annotations.component, "component");
    }

    #[test]
    fn test_invalid_view_function() {
        let config: Config = toml::from_str("[generation]\nview_function = \"View\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(crate::error::CliError::Config(ConfigError::InvalidValue { key, .. }))
                if key == "generation.view_function"
        ));
    }

    #[test]
    fn test_invalid_module_prefix() {
        let config: Config = toml::from_str("[output]\nmodule_prefix = \"ui.components\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[output]\ndir = \"out\"\n").unwrap();

        let config = ConfigManager::load(Some(&path)).unwrap();
        assert_eq!(config.output.dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            ConfigManager::load(Some(&path)),
            Err(crate::error::CliError::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[output\n").unwrap();
        assert!(matches!(
            ConfigManager::load(Some(&path)),
            Err(crate::error::CliError::Config(ConfigError::InvalidToml { .. }))
        ));
    }
}
