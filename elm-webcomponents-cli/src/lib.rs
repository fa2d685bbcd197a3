//! # elm-webcomponents-cli
//!
//! CLI library for generating Elm modules from annotated TypeScript web
//! components.
//!
//! This crate provides the file-level side of the `elm-webcomponents` tool:
//! reading TypeScript sources, resolving their types, and writing the
//! modules produced by the [`elm_webcomponents`] generator.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Input file discovery
//! - [`typescript`] - TypeScript lexer, parser and type host
//! - [`generator`] - Batch generation across all input files
//! - [`writer`] - Module output to disk or stdout
//! - [`logging`] - `tracing` subscriber setup
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod scanner;
pub mod typescript;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{BatchGenerator, BatchOutput};
pub use scanner::{SourceFile, SourceScanner};
pub use typescript::TsProgram;
pub use writer::{ModuleWriter, WriteResult};
