//! Type classification.
//!
//! [`Classifier`] turns a host type handle into a fully materialized
//! [`Shape`]. This is the only place that looks at host type categories;
//! after classification the emitters never talk to the host again.
//!
//! # Classification table
//!
//! | Host kind | Shape |
//! |-----------|-------|
//! | `string` / string literal | `Primitive(String)` / `Literal(String)` |
//! | `number` / number literal | `Primitive(Number)` / `Literal(Number)` |
//! | `boolean`, boolean literal, union of boolean literals | `Primitive(Boolean)` |
//! | array of `E` | `Array(classify(E))` |
//! | object with members | `Record(..)` in member order |
//! | enum | `Enum` |
//! | other unions | `Union` |
//! | unbound type parameter | `TypeParameter` |
//! | `any`, `unknown`, empty types, `symbol`, `bigint`, others | `Unsupported` |

use tracing::trace;

use crate::host::{TypeHost, TypeKind};
use crate::ir::{Field, LiteralValue, PrimitiveKind, Shape, Unsupported, UnsupportedReason};

/// Materializes host types into [`Shape`]s.
#[derive(Debug)]
pub struct Classifier<'h, H> {
    host: &'h H,
}

impl<'h, H: TypeHost> Classifier<'h, H> {
    /// Create a classifier over a host.
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Classify a type and everything reachable from it.
    ///
    /// Total over [`TypeKind`]: every input produces a shape, rejected
    /// categories become [`Shape::Unsupported`].
    pub fn classify(&self, ty: &H::Type) -> Shape {
        let mut visiting = Vec::new();
        self.classify_in(ty, &mut visiting)
    }

    fn classify_in(&self, ty: &H::Type, visiting: &mut Vec<H::Type>) -> Shape {
        let kind = self.host.kind(ty);
        trace!(ty = %self.host.display(ty), ?kind, "classifying");

        match kind {
            TypeKind::String => Shape::Primitive(PrimitiveKind::String),
            TypeKind::Number => Shape::Primitive(PrimitiveKind::Number),
            TypeKind::Boolean | TypeKind::BooleanLiteral(_) => {
                Shape::Primitive(PrimitiveKind::Boolean)
            }
            TypeKind::StringLiteral(value) => Shape::Literal(LiteralValue::String(value)),
            TypeKind::NumberLiteral(value) => Shape::Literal(LiteralValue::Number(value)),

            TypeKind::Union(members) => self.classify_union(ty, &members),
            TypeKind::Enum(name) => Shape::Enum { name },
            TypeKind::TypeParameter(name) => Shape::TypeParameter { name },
            TypeKind::Object => self.classify_object(ty, visiting),

            TypeKind::Any => self.unsupported(ty, UnsupportedReason::Any),
            TypeKind::Unknown => self.unsupported(ty, UnsupportedReason::Unknown),
            TypeKind::Void | TypeKind::Undefined | TypeKind::Null | TypeKind::Never => {
                self.unsupported(ty, UnsupportedReason::Empty)
            }
            TypeKind::Symbol => self.unsupported(ty, UnsupportedReason::Symbol),
            TypeKind::BigInt => self.unsupported(ty, UnsupportedReason::BigInt),
            TypeKind::Other(what) => self.unsupported(ty, UnsupportedReason::Advanced(what)),
        }
    }

    /// Unions made only of `boolean` and boolean literals are plain
    /// booleans; anything else is deferred to the emitters as a placeholder.
    fn classify_union(&self, ty: &H::Type, members: &[H::Type]) -> Shape {
        let all_boolean = !members.is_empty()
            && members
                .iter()
                .all(|m| {
                    matches!(
                        self.host.kind(m),
                        TypeKind::Boolean | TypeKind::BooleanLiteral(_)
                    )
                });

        if all_boolean {
            return Shape::Primitive(PrimitiveKind::Boolean);
        }

        let described: Vec<String> = members.iter().map(|m| self.host.display(m)).collect();
        if described.is_empty() {
            return self.unsupported(ty, UnsupportedReason::Empty);
        }
        Shape::Union { members: described }
    }

    /// Arrays take priority over generic object decomposition.
    fn classify_object(&self, ty: &H::Type, visiting: &mut Vec<H::Type>) -> Shape {
        if visiting.contains(ty) {
            return self.unsupported(ty, UnsupportedReason::Recursive);
        }

        visiting.push(ty.clone());
        let shape = match self.host.array_element(ty) {
            Some(element) => Shape::array(self.classify_in(&element, visiting)),
            None => Shape::Record(
                self.host
                    .members(ty)
                    .into_iter()
                    .map(|member| Field::new(member.name, self.classify_in(&member.ty, visiting)))
                    .collect(),
            ),
        };
        visiting.pop();

        shape
    }

    fn unsupported(&self, ty: &H::Type, reason: UnsupportedReason) -> Shape {
        Shape::Unsupported(Unsupported {
            reason,
            type_text: self.host.display(ty),
        })
    }
}
