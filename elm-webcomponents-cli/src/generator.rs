//! Batch generation over all input files.
//!
//! Every file is parsed into one [`TsProgram`], then each class is run
//! through the [`ComponentGenerator`]. A failing file or declaration does
//! not stop the batch; its error is collected and the rest is generated.

use crate::error::{CliError, WriteError};
use crate::scanner::SourceFile;
use crate::typescript::{parse_file, SourceDeclaration, TsProgram};
use elm_webcomponents::{ComponentGenerator, Diagnostic, GeneratedModule, GeneratorConfig};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A generated module and the file its component came from.
#[derive(Debug, Clone)]
pub struct ModuleOutput {
    /// Source file of the component.
    pub source: PathBuf,

    /// The generated module.
    pub module: GeneratedModule,
}

/// Everything a batch produced.
#[derive(Debug, Default)]
pub struct BatchOutput {
    /// Modules in input order.
    pub modules: Vec<ModuleOutput>,

    /// Failures in the order they occurred.
    pub errors: Vec<CliError>,
}

impl BatchOutput {
    /// True when no file or declaration failed.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of placeholder diagnostics across all modules.
    pub fn diagnostic_count(&self) -> usize {
        self.modules.iter().map(|m| m.module.diagnostics.len()).sum()
    }

    /// Placeholder diagnostics of every module with their source file, in
    /// module order.
    pub fn diagnostics(&self) -> impl Iterator<Item = (&Path, &Diagnostic)> {
        self.modules.iter().flat_map(|m| {
            m.module
                .diagnostics
                .iter()
                .map(move |d| (m.source.as_path(), d))
        })
    }
}

/// Generates Elm modules for every component in a set of files.
#[derive(Debug, Clone, Default)]
pub struct BatchGenerator {
    config: GeneratorConfig,
}

impl BatchGenerator {
    /// Create a new batch generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Parse all files and generate one module per component.
    pub fn generate(&self, files: &[SourceFile]) -> BatchOutput {
        let mut output = BatchOutput::default();

        let mut program = TsProgram::new();
        for file in files {
            match parse_file(&file.path, &file.content) {
                Ok(module) => program.add_module(&file.path, module),
                Err(e) => output.errors.push(e.into()),
            }
        }
        debug!(declarations = program.len(), "parsed input files");

        let generator = ComponentGenerator::new(&program, self.config.clone());
        let mut module_names = HashSet::new();

        for SourceDeclaration { file, declaration } in program.declarations() {
            match generator.generate(&declaration) {
                Ok(Some(module)) => {
                    if !module_names.insert(module.module_name.clone()) {
                        output.errors.push(
                            WriteError::DuplicateModule {
                                module: module.module_name,
                            }
                            .into(),
                        );
                        continue;
                    }
                    output.modules.push(ModuleOutput {
                        source: file,
                        module,
                    });
                }
                Ok(None) => debug!(class = %declaration.name, "not a component"),
                Err(e) => output.errors.push(CliError::generate(file, e)),
            }
        }

        output
    }
}
