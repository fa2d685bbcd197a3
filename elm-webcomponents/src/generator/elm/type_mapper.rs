//! Shape to Elm type mappings.
//!
//! # Type Mappings
//!
//! | Shape | Elm type |
//! |-------|----------|
//! | string (and string literals) | `String` |
//! | number (and number literals) | `Float` |
//! | boolean | `Bool` |
//! | array of `E` | `List (E)` |
//! | record | `{ a : A, b : B }` |
//! | enum, union | `Never` (placeholder) |

use super::{record_field_names, unsupported};
use crate::error::EmitError;
use crate::ir::{PrimitiveKind, Shape};

/// Type used where a feature is not implemented yet.
pub const PLACEHOLDER_TYPE: &str = "Never";

/// Map a shape to its Elm type annotation.
pub fn emit_type(shape: &Shape) -> Result<String, EmitError> {
    match shape {
        Shape::Primitive(kind) => Ok(primitive_type(*kind).to_string()),
        Shape::Literal(literal) => Ok(primitive_type(literal.kind()).to_string()),
        Shape::Array(element) => Ok(format!("List ({})", emit_type(element)?)),
        Shape::Record(fields) => {
            if fields.is_empty() {
                return Ok("{}".to_string());
            }
            let names = record_field_names(fields)?;
            let fields = names
                .iter()
                .zip(fields)
                .map(|(name, field)| -> Result<String, EmitError> {
                    Ok(format!("{name} : {}", emit_type(&field.shape)?))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{{ {} }}", fields.join(", ")))
        }
        Shape::Enum { .. } | Shape::Union { .. } => Ok(PLACEHOLDER_TYPE.to_string()),
        Shape::TypeParameter { name } => Err(EmitError::type_parameter(name)),
        Shape::Unsupported(rejected) => Err(unsupported(rejected)),
    }
}

fn primitive_type(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => "String",
        PrimitiveKind::Number => "Float",
        PrimitiveKind::Boolean => "Bool",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Field, LiteralValue, Unsupported, UnsupportedReason};

    #[test]
    fn test_primitives() {
        assert_eq!(emit_type(&Shape::string()).unwrap(), "String");
        assert_eq!(emit_type(&Shape::number()).unwrap(), "Float");
        assert_eq!(emit_type(&Shape::boolean()).unwrap(), "Bool");
    }

    #[test]
    fn test_literals_widen() {
        let literal = Shape::Literal(LiteralValue::Number(1.0));
        assert_eq!(emit_type(&literal).unwrap(), "Float");
    }

    #[test]
    fn test_array_of_records() {
        let shape = Shape::array(Shape::Record(vec![Field::new(
            "foo",
            Shape::array(Shape::number()),
        )]));
        assert_eq!(emit_type(&shape).unwrap(), "List ({ foo : List (Float) })");
    }

    #[test]
    fn test_empty_record() {
        assert_eq!(emit_type(&Shape::Record(Vec::new())).unwrap(), "{}");
    }

    #[test]
    fn test_placeholder_type() {
        let shape = Shape::Enum {
            name: "Color".to_string(),
        };
        assert_eq!(emit_type(&shape).unwrap(), "Never");
    }

    #[test]
    fn test_rejected_shapes() {
        let shape = Shape::Record(vec![Field::new(
            "value",
            Shape::Unsupported(Unsupported {
                reason: UnsupportedReason::Any,
                type_text: "any".to_string(),
            }),
        )]);
        assert_eq!(
            emit_type(&shape).unwrap_err(),
            EmitError::unsupported("any", &UnsupportedReason::Any)
        );

        let shape = Shape::TypeParameter {
            name: "T".to_string(),
        };
        assert!(emit_type(&shape).is_err());
    }

    #[test]
    fn test_invalid_field_name() {
        let shape = Shape::Record(vec![Field::new("data-id", Shape::string())]);
        assert_eq!(
            emit_type(&shape).unwrap_err(),
            EmitError::InvalidFieldName {
                name: "data-id".to_string()
            }
        );
    }

    #[test]
    fn test_reserved_field_names_are_suffixed() {
        let shape = Shape::Record(vec![
            Field::new("name", Shape::string()),
            Field::new("type", Shape::string()),
        ]);
        assert_eq!(emit_type(&shape).unwrap(), "{ name : String, type_ : String }");

        let clash = Shape::Record(vec![
            Field::new("type_", Shape::string()),
            Field::new("type", Shape::string()),
        ]);
        assert_eq!(
            emit_type(&clash).unwrap_err(),
            EmitError::InvalidFieldName {
                name: "type".to_string()
            }
        );
    }
}
