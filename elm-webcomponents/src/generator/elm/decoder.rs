//! `Json.Decode` decoder emitter.
//!
//! Records are decoded applicatively: a constructor lambda taking one
//! positional argument per field is fed field decoders in declaration order.
//!
//! ```text
//! Decode.succeed (\arg0 arg1 -> { a = arg0, b = arg1 })
//!     |> Decode.map2 (|>) (Decode.field "a" Decode.string)
//!     |> Decode.map2 (|>) (Decode.field "b" Decode.float)
//! ```
//!
//! (emitted on a single line).

use super::naming::{arg, string_literal};
use super::{json_primitive, placeholder_feature, record_field_names, unsupported};
use crate::error::EmitError;
use crate::ir::Shape;

/// Build a decoder for a shape.
pub fn emit_decoder(shape: &Shape) -> Result<String, EmitError> {
    match shape {
        Shape::Primitive(kind) => Ok(format!("Decode.{}", json_primitive(*kind))),
        Shape::Literal(literal) => Ok(format!("Decode.{}", json_primitive(literal.kind()))),
        Shape::Array(element) => Ok(format!("Decode.list {}", arg(&emit_decoder(element)?))),
        Shape::Record(fields) => {
            if fields.is_empty() {
                return Ok("Decode.succeed {}".to_string());
            }

            let names = record_field_names(fields)?;
            let params: Vec<String> = (0..fields.len()).map(|i| format!("arg{i}")).collect();
            let assignments: Vec<String> = names
                .iter()
                .zip(&params)
                .map(|(name, param)| format!("{name} = {param}"))
                .collect();

            let mut decoder = format!(
                "Decode.succeed (\\{} -> {{ {} }})",
                params.join(" "),
                assignments.join(", ")
            );
            for field in fields {
                let field_decoder = format!(
                    "Decode.field {} {}",
                    string_literal(&field.name),
                    arg(&emit_decoder(&field.shape)?)
                );
                decoder.push_str(&format!(" |> Decode.map2 (|>) ({field_decoder})"));
            }
            Ok(decoder)
        }
        Shape::Enum { .. } | Shape::Union { .. } => Ok(format!(
            "Decode.fail {}",
            string_literal(&format!(
                "{} is not implemented for decoders",
                placeholder_feature(shape)
            ))
        )),
        Shape::TypeParameter { name } => Err(EmitError::type_parameter(name)),
        Shape::Unsupported(rejected) => Err(unsupported(rejected)),
    }
}
