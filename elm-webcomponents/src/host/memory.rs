//! In-memory host.
//!
//! [`MemoryHost`] is an arena of hand-built types. It backs the unit and
//! integration tests of this crate and is handy for driving the generator
//! from metadata that does not come from TypeScript sources.

use super::{TypeHost, TypeKind, TypeMember};

/// Handle to a type stored in a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

#[derive(Debug, Clone)]
struct Entry {
    kind: TypeKind<TypeId>,
    element: Option<TypeId>,
    members: Vec<TypeMember<TypeId>>,
    name: Option<String>,
}

/// Arena of types answering [`TypeHost`] queries.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    types: Vec<Entry>,
}

/// Nesting depth after which object descriptions are elided.
const DISPLAY_DEPTH: usize = 3;

impl MemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type of the given kind.
    pub fn add(&mut self, kind: TypeKind<TypeId>) -> TypeId {
        self.push(Entry {
            kind,
            element: None,
            members: Vec::new(),
            name: None,
        })
    }

    /// Add the `string` type.
    pub fn string(&mut self) -> TypeId {
        self.add(TypeKind::String)
    }

    /// Add the `number` type.
    pub fn number(&mut self) -> TypeId {
        self.add(TypeKind::Number)
    }

    /// Add the `boolean` type.
    pub fn boolean(&mut self) -> TypeId {
        self.add(TypeKind::Boolean)
    }

    /// Add a string literal type.
    pub fn string_literal(&mut self, value: impl Into<String>) -> TypeId {
        self.add(TypeKind::StringLiteral(value.into()))
    }

    /// Add a union of existing types.
    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        self.add(TypeKind::Union(members))
    }

    /// Add an array of `element`.
    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.push(Entry {
            kind: TypeKind::Object,
            element: Some(element),
            members: Vec::new(),
            name: None,
        })
    }

    /// Add an undocumented object type.
    pub fn object(&mut self, members: &[(&str, TypeId)]) -> TypeId {
        let members = members
            .iter()
            .map(|(name, ty)| TypeMember::new(*name, "", *ty))
            .collect();
        self.record(members)
    }

    /// Add an object type with fully specified members.
    pub fn record(&mut self, members: Vec<TypeMember<TypeId>>) -> TypeId {
        self.push(Entry {
            kind: TypeKind::Object,
            element: None,
            members,
            name: None,
        })
    }

    /// Replace the members of an object type.
    ///
    /// Lets an object refer to itself: add it empty, then fill it in.
    pub fn set_members(&mut self, ty: TypeId, members: Vec<TypeMember<TypeId>>) {
        if let Some(entry) = self.types.get_mut(ty.0) {
            entry.members = members;
        }
    }

    /// Give a type a display name, e.g. the alias it was declared under.
    pub fn name(&mut self, ty: TypeId, name: impl Into<String>) -> TypeId {
        if let Some(entry) = self.types.get_mut(ty.0) {
            entry.name = Some(name.into());
        }
        ty
    }

    fn push(&mut self, entry: Entry) -> TypeId {
        self.types.push(entry);
        TypeId(self.types.len() - 1)
    }

    fn entry(&self, ty: TypeId) -> Option<&Entry> {
        self.types.get(ty.0)
    }

    fn describe(&self, ty: TypeId, depth: usize) -> String {
        let Some(entry) = self.entry(ty) else {
            return "<missing>".to_string();
        };
        if let Some(name) = &entry.name {
            return name.clone();
        }

        match &entry.kind {
            TypeKind::String => "string".to_string(),
            TypeKind::Number => "number".to_string(),
            TypeKind::Boolean => "boolean".to_string(),
            TypeKind::StringLiteral(value) => format!("{value:?}"),
            TypeKind::NumberLiteral(value) => value.to_string(),
            TypeKind::BooleanLiteral(value) => value.to_string(),
            TypeKind::BigInt => "bigint".to_string(),
            TypeKind::Symbol => "symbol".to_string(),
            TypeKind::Void => "void".to_string(),
            TypeKind::Undefined => "undefined".to_string(),
            TypeKind::Null => "null".to_string(),
            TypeKind::Never => "never".to_string(),
            TypeKind::Unknown => "unknown".to_string(),
            TypeKind::Any => "any".to_string(),
            TypeKind::Enum(name) | TypeKind::TypeParameter(name) | TypeKind::Other(name) => {
                name.clone()
            }
            TypeKind::Union(members) => members
                .iter()
                .map(|m| self.describe(*m, depth + 1))
                .collect::<Vec<_>>()
                .join(" | "),
            TypeKind::Object if depth >= DISPLAY_DEPTH => "{ ... }".to_string(),
            TypeKind::Object => match entry.element {
                Some(element) => format!("{}[]", self.describe(element, depth + 1)),
                None if entry.members.is_empty() => "{}".to_string(),
                None => {
                    let members: Vec<String> = entry
                        .members
                        .iter()
                        .map(|m| format!("{}: {}", m.name, self.describe(m.ty, depth + 1)))
                        .collect();
                    format!("{{ {} }}", members.join("; "))
                }
            },
        }
    }
}

impl TypeHost for MemoryHost {
    type Type = TypeId;

    fn kind(&self, ty: &TypeId) -> TypeKind<TypeId> {
        self.entry(*ty)
            .map(|e| e.kind.clone())
            .unwrap_or_else(|| TypeKind::Other("missing type".to_string()))
    }

    fn array_element(&self, ty: &TypeId) -> Option<TypeId> {
        self.entry(*ty).and_then(|e| e.element)
    }

    fn members(&self, ty: &TypeId) -> Vec<TypeMember<TypeId>> {
        self.entry(*ty).map(|e| e.members.clone()).unwrap_or_default()
    }

    fn display(&self, ty: &TypeId) -> String {
        self.describe(*ty, 0)
    }
}
