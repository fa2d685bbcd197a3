//! TypeScript reader.
//!
//! - [`lexer`] - `logos` tokenizer with doc comment attachment
//! - [`parser`] - declaration parser producing the [`ast`]
//! - [`host`] - [`TsProgram`], the [`TypeHost`](elm_webcomponents::TypeHost)
//!   over all parsed files

pub mod ast;
pub mod host;
pub mod lexer;
pub mod parser;

pub use host::{SourceDeclaration, TsProgram, TsType};

use crate::error::ParseError;
use std::path::Path;

/// Parse one file, reporting errors with their line and column.
pub fn parse_file(path: &Path, source: &str) -> Result<ast::Module, ParseError> {
    parser::parse(source).map_err(|e| {
        let (line, column) = lexer::line_column(source, e.offset);
        ParseError::syntax(path.to_path_buf(), line, column, e.message)
    })
}
