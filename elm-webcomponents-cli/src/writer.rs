//! Module writer.
//!
//! Writes each generated module under the output directory at its module
//! path (`Components/MyElement.elm`), or prints it when no directory is
//! configured.

use crate::error::{CliResult, WriteError};
use elm_webcomponents::GeneratedModule;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Result of a write operation.
#[derive(Debug, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// File already had the generated content.
    Unchanged {
        /// Path to the existing file.
        path: PathBuf,
    },
    /// Module was printed instead of written.
    Printed {
        /// Name of the printed module.
        module_name: String,
    },
}

/// Writes modules to a directory or to an output stream.
#[derive(Debug, Clone, Default)]
pub struct ModuleWriter {
    /// Output directory; `None` prints modules.
    output_dir: Option<PathBuf>,
}

impl ModuleWriter {
    /// Create a new writer.
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self { output_dir }
    }

    /// Where a module would be written.
    pub fn target_path(&self, module: &GeneratedModule) -> Option<PathBuf> {
        self.output_dir
            .as_ref()
            .map(|dir| dir.join(&module.relative_path))
    }

    /// Write one module.
    ///
    /// Without an output directory the module text goes to `out`, followed
    /// by a blank line separating it from the next one.
    pub fn write(&self, module: &GeneratedModule, out: &mut impl Write) -> CliResult<WriteResult> {
        let Some(path) = self.target_path(module) else {
            out.write_all(module.content.as_bytes())?;
            out.write_all(b"\n")?;
            return Ok(WriteResult::Printed {
                module_name: module.module_name.clone(),
            });
        };

        if std::fs::read_to_string(&path).is_ok_and(|existing| existing == module.content) {
            return Ok(WriteResult::Unchanged { path });
        }

        write_file(&path, &module.content)?;
        Ok(WriteResult::Written {
            bytes: module.content.len(),
            path,
        })
    }
}

fn write_file(path: &Path, content: &str) -> CliResult<()> {
    // Create parent directories if needed
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

impl WriteResult {
    /// Get the path associated with this result, if it went to a file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WriteResult::Written { path, .. } | WriteResult::Unchanged { path } => Some(path),
            WriteResult::Printed { .. } => None,
        }
    }

    /// Check if a file was created or modified.
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}
