//! `Json.Encode` expression emitter.

use super::naming::string_literal;
use super::{json_primitive, placeholder_feature, record_field_names, unsupported};
use crate::error::EmitError;
use crate::ir::{PrimitiveKind, Shape};

/// Build an expression encoding `value` as JSON.
///
/// `value` must be an atomic Elm expression such as `val` or `req.items`.
/// Array elements are bound by nested lambdas named `el`, `el1`, `el2`, ...
/// so inner bindings never shadow outer ones.
pub fn emit_encoder(shape: &Shape, value: &str) -> Result<String, EmitError> {
    encode(shape, value, 0)
}

fn encode(shape: &Shape, value: &str, depth: usize) -> Result<String, EmitError> {
    match shape {
        Shape::Primitive(kind) => Ok(primitive(*kind, value)),
        Shape::Literal(literal) => Ok(primitive(literal.kind(), value)),
        Shape::Array(element) => {
            let var = lambda_var(depth);
            let body = encode(element, &var, depth + 1)?;
            Ok(format!("Encode.list (\\{var} -> {body}) {value}"))
        }
        Shape::Record(fields) => {
            if fields.is_empty() {
                return Ok("Encode.object []".to_string());
            }
            let names = record_field_names(fields)?;
            let entries = names
                .iter()
                .zip(fields)
                .map(|(name, field)| -> Result<String, EmitError> {
                    let encoded = encode(&field.shape, &format!("{value}.{name}"), depth)?;
                    Ok(format!("( {}, {} )", string_literal(&field.name), encoded))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("Encode.object [ {} ]", entries.join(", ")))
        }
        Shape::Enum { .. } | Shape::Union { .. } => Ok(format!(
            "Debug.todo {}",
            string_literal(&format!(
                "{} is not implemented for encoders",
                placeholder_feature(shape)
            ))
        )),
        Shape::TypeParameter { name } => Err(EmitError::type_parameter(name)),
        Shape::Unsupported(rejected) => Err(unsupported(rejected)),
    }
}

fn primitive(kind: PrimitiveKind, value: &str) -> String {
    format!("Encode.{} {}", json_primitive(kind), value)
}

fn lambda_var(depth: usize) -> String {
    if depth == 0 {
        "el".to_string()
    } else {
        format!("el{depth}")
    }
}
