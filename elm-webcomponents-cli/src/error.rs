//! Error types for the CLI.
//!
//! Every failure carries the file it happened in, so a batch run can report
//! all of them before exiting.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input path could not be read.
    #[error("Failed to load input: {0}")]
    Load(#[from] LoadError),

    /// A TypeScript file could not be parsed.
    #[error("Failed to parse source file: {0}")]
    Parse(#[from] ParseError),

    /// A component declaration could not be turned into a module.
    #[error("Failed to generate module from {}: {source}", .file.display())]
    Generate {
        file: PathBuf,
        #[source]
        source: elm_webcomponents::GenerateError,
    },

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error while collecting input files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Path does not exist.
    #[error("Path not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// File could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the directory walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Error while reading TypeScript source.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Syntax error in TypeScript source.
    #[error("Syntax error in {}:{line}:{column}: {message}", .file.display())]
    Syntax {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {}: {message}", .path.display())]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two components map to the same output module.
    #[error("Module {module} is generated by more than one component")]
    DuplicateModule { module: String },
}

impl CliError {
    /// Attribute a generator error to its source file.
    pub fn generate(file: impl Into<PathBuf>, source: elm_webcomponents::GenerateError) -> Self {
        Self::Generate {
            file: file.into(),
            source,
        }
    }
}

impl LoadError {
    /// Create a path not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

impl ParseError {
    /// Create a syntax error with location information.
    pub fn syntax(file: PathBuf, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            file,
            line,
            column,
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elm_webcomponents::GenerateError;

    #[test]
    fn test_syntax_error_display() {
        let error = ParseError::syntax(PathBuf::from("src/button.ts"), 3, 14, "expected '>'");
        assert_eq!(
            error.to_string(),
            "Syntax error in src/button.ts:3:14: expected '>'"
        );
    }

    #[test]
    fn test_generate_error_names_file() {
        let error = CliError::generate(
            "src/button.ts",
            GenerateError::missing_tag_name("MyButton"),
        );
        assert_eq!(
            error.to_string(),
            "Failed to generate module from src/button.ts: \
             MyButton: no tag name found on the component annotation"
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let error: CliError = ConfigError::invalid_value("generation.view_function", "not a lowercase Elm identifier").into();
        assert!(matches!(error, CliError::Config(ConfigError::InvalidValue { .. })));
    }
}
