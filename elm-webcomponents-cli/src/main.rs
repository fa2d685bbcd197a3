//! # elm-webcomponents
//!
//! Generate Elm modules from TypeScript web components.
//!
//! ## Usage
//!
//! ```bash
//! # Print modules for every component in a directory
//! elm-webcomponents src/components
//!
//! # Write into the directory set in elm-webcomponents.toml
//! elm-webcomponents src/components/my-element.ts src/types.ts
//! ```

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use elm_webcomponents_cli::{
    config::ConfigManager,
    error::CliError,
    generator::BatchGenerator,
    logging,
    scanner::SourceScanner,
    writer::{ModuleWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "elm-webcomponents")]
#[command(author, version, about = "Generate Elm modules from TypeScript web components", long_about = None)]
struct Cli {
    /// TypeScript files or directories to read
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Generate every module, returning whether all inputs succeeded.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = ConfigManager::load_from_env().context("could not load configuration")?;

    let (files, load_errors) = SourceScanner::new(cli.files).scan();
    let mut errors: Vec<CliError> = load_errors.into_iter().map(CliError::from).collect();

    if files.is_empty() && errors.is_empty() {
        eprintln!("{}", "No TypeScript files found.".yellow());
        return Ok(true);
    }

    let output = BatchGenerator::new(config.generator_config()).generate(&files);
    let writer = ModuleWriter::new(config.output.dir.clone());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for generated in &output.modules {
        match writer.write(&generated.module, &mut out) {
            Ok(WriteResult::Written { path, bytes }) => {
                eprintln!(
                    "{} Written {} bytes to {}",
                    "✓".green(),
                    bytes,
                    path.display()
                );
            }
            Ok(WriteResult::Unchanged { path }) => {
                eprintln!("{} Unchanged {}", "✓".green(), path.display());
            }
            Ok(WriteResult::Printed { .. }) => {}
            Err(e) => errors.push(e),
        }
    }
    out.flush().context("could not flush stdout")?;

    for (source, diagnostic) in output.diagnostics() {
        warn!(file = %source.display(), "{diagnostic}");
    }

    errors.extend(output.errors);
    for error in &errors {
        print_error(error);
    }

    if errors.is_empty() {
        Ok(true)
    } else {
        eprintln!(
            "{} {} module(s) generated, {} failure(s)",
            "✗".red(),
            output.modules.len(),
            errors.len()
        );
        Ok(false)
    }
}

/// Print an error with formatting.
fn print_error(error: &CliError) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}
