//! Elm code generator.
//!
//! This module turns classified [`Shape`]s and component descriptors into
//! Elm source text.
//!
//! # Components
//!
//! - [`emit_type`] - Elm type annotation for a shape
//! - [`emit_encoder`] - `Json.Encode` expression for a value of a shape
//! - [`emit_decoder`] - `Json.Decode` decoder for a shape
//! - [`ElmModuleFormatter`] - assembles a complete module per component
//!
//! The three emitters recurse over the shape in exactly the same way, so
//! record fields and array elements appear in the same order in all of them.

pub mod decoder;
pub mod encoder;
pub mod formatter;
pub mod naming;
pub mod type_mapper;

pub use decoder::emit_decoder;
pub use encoder::emit_encoder;
pub use formatter::ElmModuleFormatter;
pub use type_mapper::emit_type;

use crate::error::EmitError;
use crate::ir::{Field, PrimitiveKind, Shape, Unsupported};

/// Elm names for the fields of a record, in field order.
///
/// Reserved words get a trailing underscore (`type` becomes `type_`); the
/// JSON key stays the original name. Names that are not Elm identifiers, or
/// that clash after renaming, are rejected.
pub(crate) fn record_field_names(fields: &[Field]) -> Result<Vec<String>, EmitError> {
    let mut names: Vec<String> = Vec::with_capacity(fields.len());
    for field in fields {
        let name = if naming::is_reserved_word(&field.name) {
            format!("{}_", field.name)
        } else if naming::is_lower_identifier(&field.name) {
            field.name.clone()
        } else {
            return Err(EmitError::InvalidFieldName {
                name: field.name.clone(),
            });
        };
        if names.contains(&name) {
            return Err(EmitError::InvalidFieldName {
                name: field.name.clone(),
            });
        }
        names.push(name);
    }
    Ok(names)
}

pub(crate) fn unsupported(unsupported: &Unsupported) -> EmitError {
    EmitError::unsupported(&unsupported.type_text, &unsupported.reason)
}

/// Feature text for enum and union placeholders.
pub(crate) fn placeholder_feature(shape: &Shape) -> String {
    shape.placeholder_feature().unwrap_or_default()
}

/// Suffix shared by the `Json.Encode`/`Json.Decode` primitive functions.
pub(crate) fn json_primitive(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => "string",
        PrimitiveKind::Number => "float",
        PrimitiveKind::Boolean => "bool",
    }
}
