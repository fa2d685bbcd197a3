//! Input file discovery.
//!
//! Paths given on the command line are read as-is; directories are walked
//! for `.ts` sources, respecting `.gitignore` patterns and skipping
//! declaration files (`.d.ts`).

use crate::error::LoadError;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A discovered source file with its content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path as given or as found under a walked directory.
    pub path: PathBuf,

    /// File content.
    pub content: String,
}

/// Scanner for TypeScript input files.
#[derive(Debug)]
pub struct SourceScanner {
    /// Files and directories to read, in order.
    inputs: Vec<PathBuf>,
}

impl SourceScanner {
    /// Create a new scanner over the given inputs.
    pub fn new(inputs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Read every input.
    ///
    /// Files come back in input order, directory contents sorted by name.
    /// Failures do not stop the scan; they are returned alongside the files
    /// that could be read.
    pub fn scan(&self) -> (Vec<SourceFile>, Vec<LoadError>) {
        let mut files = Vec::new();
        let mut errors = Vec::new();

        for input in &self.inputs {
            if input.is_dir() {
                self.walk(input, &mut files, &mut errors);
            } else if input.exists() {
                match read(input) {
                    Ok(file) => files.push(file),
                    Err(e) => errors.push(e),
                }
            } else {
                errors.push(LoadError::not_found(input.clone()));
            }
        }

        debug!(files = files.len(), errors = errors.len(), "scanned inputs");
        (files, errors)
    }

    fn walk(&self, root: &Path, files: &mut Vec<SourceFile>, errors: &mut Vec<LoadError>) {
        // .gitignore applies outside of git checkouts too
        let walker = WalkBuilder::new(root)
            .require_git(false)
            .hidden(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    errors.push(LoadError::Walk(e));
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() && is_typescript_source(path) {
                match read(path) {
                    Ok(file) => files.push(file),
                    Err(e) => errors.push(e),
                }
            }
        }
    }
}

/// `.ts` files that are not declaration files.
pub fn is_typescript_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".ts") && !name.ends_with(".d.ts")
}

fn read(path: &Path) -> Result<SourceFile, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(SourceFile {
        path: path.to_path_buf(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/widgets")).unwrap();
        fs::write(dir.path().join("src/button.ts"), "export class A {}").unwrap();
        fs::write(dir.path().join("src/widgets/card.ts"), "export class B {}").unwrap();
        fs::write(dir.path().join("src/globals.d.ts"), "declare const x: number;").unwrap();
        fs::write(dir.path().join("src/readme.md"), "# readme").unwrap();
        dir
    }

    fn names(files: &[SourceFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_walks_directories_for_ts_sources() {
        let dir = create_test_dir();
        let (files, errors) = SourceScanner::new([dir.path().join("src")]).scan();

        assert!(errors.is_empty());
        assert_eq!(names(&files), vec!["button.ts", "card.ts"]);
    }

    #[test]
    fn test_ignored_files_are_skipped() {
        let dir = create_test_dir();
        fs::write(dir.path().join("src/.gitignore"), "generated/\n").unwrap();
        fs::create_dir_all(dir.path().join("src/generated")).unwrap();
        fs::write(dir.path().join("src/generated/out.ts"), "export class C {}").unwrap();

        let (files, errors) = SourceScanner::new([dir.path().join("src")]).scan();
        assert!(errors.is_empty());
        assert_eq!(names(&files), vec!["button.ts", "card.ts"]);
    }

    #[test]
    fn test_explicit_files_keep_input_order() {
        let dir = create_test_dir();
        let (files, errors) = SourceScanner::new([
            dir.path().join("src/widgets/card.ts"),
            dir.path().join("src/button.ts"),
        ])
        .scan();

        assert!(errors.is_empty());
        assert_eq!(names(&files), vec!["card.ts", "button.ts"]);
        assert_eq!(files[0].content, "export class B {}");
    }

    #[test]
    fn test_missing_path_is_reported() {
        let dir = create_test_dir();
        let (files, errors) = SourceScanner::new([
            dir.path().join("nope.ts"),
            dir.path().join("src/button.ts"),
        ])
        .scan();

        assert_eq!(files.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], LoadError::NotFound { .. }));
    }

    #[test]
    fn test_is_typescript_source() {
        assert!(is_typescript_source(Path::new("a/button.ts")));
        assert!(!is_typescript_source(Path::new("a/types.d.ts")));
        assert!(!is_typescript_source(Path::new("a/button.tsx")));
        assert!(!is_typescript_source(Path::new("a/button.js")));
    }
}
