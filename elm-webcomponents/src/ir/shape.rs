//! Shape IR definitions.
//!
//! A [`Shape`] is the single description of "what a type is" for code
//! generation. The classifier produces it once per type expression and the
//! emitters only ever pattern-match over it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural category of a type, fully materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Shape {
    /// String, number or boolean.
    Primitive(PrimitiveKind),

    /// A string or number literal type.
    Literal(LiteralValue),

    /// An array of elements of one shape.
    Array(Box<Shape>),

    /// A structural object. Fields keep the declaration order of the
    /// underlying type.
    Record(Vec<Field>),

    /// A named enumeration. Not yet implemented by the emitters.
    Enum { name: String },

    /// A union that is not a plain boolean. Not yet implemented by the
    /// emitters.
    Union { members: Vec<String> },

    /// An unbound type parameter. Always rejected.
    TypeParameter { name: String },

    /// A type that has no sound encoding.
    Unsupported(Unsupported),
}

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
}

/// Value of a literal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    String(String),
    Number(f64),
}

impl LiteralValue {
    /// The primitive a literal widens to.
    ///
    /// Emitters render literal types through this, so literals are encoded
    /// exactly like their base primitive everywhere.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            LiteralValue::String(_) => PrimitiveKind::String,
            LiteralValue::Number(_) => PrimitiveKind::Number,
        }
    }
}

/// A named record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub shape: Shape,
}

impl Field {
    /// Create a field.
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

/// A rejected type together with its printable description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unsupported {
    pub reason: UnsupportedReason,
    /// The host's description of the offending type.
    pub type_text: String,
}

/// Why a type was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsupportedReason {
    Any,
    Unknown,
    /// `void`, `undefined`, `null` or `never`.
    Empty,
    Symbol,
    BigInt,
    /// The type refers to itself.
    Recursive,
    /// Intersections, functions, unresolved references and similar.
    Advanced(String),
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedReason::Any => write!(f, "any type not supported"),
            UnsupportedReason::Unknown => write!(
                f,
                "the type was unknown, but the type must be known to infer an encoder"
            ),
            UnsupportedReason::Empty => write!(f, "empty/void types not supported"),
            UnsupportedReason::Symbol => write!(f, "symbol type not supported"),
            UnsupportedReason::BigInt => write!(f, "bigint type not supported"),
            UnsupportedReason::Recursive => write!(f, "recursive types not supported"),
            UnsupportedReason::Advanced(what) => write!(f, "advanced types not supported ({what})"),
        }
    }
}

/// A not-yet-implemented shape found inside a larger shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Short description, e.g. `enum Color`.
    pub feature: String,
}

impl Shape {
    /// Shorthand for a string primitive.
    pub fn string() -> Self {
        Shape::Primitive(PrimitiveKind::String)
    }

    /// Shorthand for a number primitive.
    pub fn number() -> Self {
        Shape::Primitive(PrimitiveKind::Number)
    }

    /// Shorthand for a boolean primitive.
    pub fn boolean() -> Self {
        Shape::Primitive(PrimitiveKind::Boolean)
    }

    /// Shorthand for an array shape.
    pub fn array(element: Shape) -> Self {
        Shape::Array(Box::new(element))
    }

    /// The first shape in pre-order that can never be emitted.
    pub fn first_rejected(&self) -> Option<&Shape> {
        match self {
            Shape::Unsupported(_) | Shape::TypeParameter { .. } => Some(self),
            Shape::Array(element) => element.first_rejected(),
            Shape::Record(fields) => fields.iter().find_map(|f| f.shape.first_rejected()),
            Shape::Primitive(_) | Shape::Literal(_) | Shape::Enum { .. } | Shape::Union { .. } => {
                None
            }
        }
    }

    /// All not-yet-implemented shapes, in field order.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        let mut found = Vec::new();
        self.collect_placeholders(&mut found);
        found
    }

    fn collect_placeholders(&self, found: &mut Vec<Placeholder>) {
        match self {
            Shape::Enum { .. } | Shape::Union { .. } => {
                if let Some(feature) = self.placeholder_feature() {
                    found.push(Placeholder { feature });
                }
            }
            Shape::Array(element) => element.collect_placeholders(found),
            Shape::Record(fields) => {
                for field in fields {
                    field.shape.collect_placeholders(found);
                }
            }
            _ => {}
        }
    }

    /// Description used by placeholder text and diagnostics.
    pub(crate) fn placeholder_feature(&self) -> Option<String> {
        match self {
            Shape::Enum { name } => Some(format!("Enum {name}")),
            Shape::Union { members } => Some(format!("Union {}", members.join(" | "))),
            _ => None,
        }
    }
}
