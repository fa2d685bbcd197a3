//! Host type layer interface.
//!
//! The generator never inspects source code directly. A host (for example
//! the TypeScript reader shipped with the CLI) owns the type model and
//! answers a small set of read-only queries about opaque type handles. It
//! also supplies the annotated declarations the extractor walks.

mod memory;

pub use memory::{MemoryHost, TypeId};

use std::fmt::Debug;
use std::hash::Hash;

/// Read-only access to a host's type model.
///
/// Handles are cheap to clone and compare; the classifier uses equality to
/// detect recursive types.
pub trait TypeHost {
    /// Opaque handle to a resolved type.
    type Type: Clone + Eq + Hash + Debug;

    /// Structural category of a type.
    fn kind(&self, ty: &Self::Type) -> TypeKind<Self::Type>;

    /// Element type when `ty` is an array type.
    fn array_element(&self, ty: &Self::Type) -> Option<Self::Type>;

    /// Named members of an object type, in declaration order.
    fn members(&self, ty: &Self::Type) -> Vec<TypeMember<Self::Type>>;

    /// Printable description used in error messages.
    fn display(&self, ty: &Self::Type) -> String;

    /// Look up a single named member.
    fn member(&self, ty: &Self::Type, name: &str) -> Option<TypeMember<Self::Type>> {
        self.members(ty).into_iter().find(|m| m.name == name)
    }
}

/// Type categories reported by a host.
///
/// This is the fixed input alphabet of the classifier. Anything a host
/// cannot express with the other variants goes into [`TypeKind::Other`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind<T> {
    String,
    Number,
    Boolean,
    StringLiteral(String),
    NumberLiteral(f64),
    BooleanLiteral(bool),
    BigInt,
    Symbol,
    Void,
    Undefined,
    Null,
    Never,
    Unknown,
    Any,
    /// A named enumeration.
    Enum(String),
    /// A union with its (flattened) members.
    Union(Vec<T>),
    /// An object type: arrays, records and interfaces all report this.
    Object,
    /// A type parameter that was never bound to a concrete type.
    TypeParameter(String),
    /// Anything else (intersections, functions, unresolved references...).
    Other(String),
}

/// A named member of an object type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMember<T> {
    /// Member name.
    pub name: String,
    /// Documentation comment, empty when undocumented.
    pub doc: String,
    /// Resolved member type.
    pub ty: T,
}

impl<T> TypeMember<T> {
    /// Create a member.
    pub fn new(name: impl Into<String>, doc: impl Into<String>, ty: T) -> Self {
        Self {
            name: name.into(),
            doc: doc.into(),
            ty,
        }
    }
}

/// A class-like declaration as seen by the extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration<T> {
    /// Declared name.
    pub name: String,
    /// Documentation comment, empty when undocumented.
    pub doc: String,
    /// Annotations (decorators) attached to the declaration, in source order.
    pub annotations: Vec<Annotation>,
    /// First type argument of the direct supertype, if any.
    pub base_type_argument: Option<T>,
    /// Members in declaration order.
    pub members: Vec<DeclaredMember<T>>,
}

impl<T> Declaration<T> {
    /// Find the first annotation with the given name.
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }
}

/// A member of a [`Declaration`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredMember<T> {
    pub name: String,
    pub doc: String,
    pub annotations: Vec<Annotation>,
    /// Resolved type of the member.
    pub ty: T,
}

impl<T> DeclaredMember<T> {
    /// Find the first annotation with the given name.
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }
}

/// A decorator application such as `@component("my-element")`.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Decorator name (last path segment).
    pub name: String,
    /// Call arguments; empty when the decorator is not called.
    pub arguments: Vec<AnnotationArg>,
}

impl Annotation {
    /// Create an annotation.
    pub fn new(name: impl Into<String>, arguments: Vec<AnnotationArg>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// The first argument when it is a string literal.
    pub fn first_string_argument(&self) -> Option<&str> {
        match self.arguments.first() {
            Some(AnnotationArg::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up `key` in the first argument when it is an object literal.
    pub fn option(&self, key: &str) -> Option<&AnnotationArg> {
        match self.arguments.first() {
            Some(AnnotationArg::Object(entries)) => {
                entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// True when the first argument is an object literal with `key: true`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.option(key), Some(AnnotationArg::Bool(true)))
    }
}

/// A constant-ish annotation argument.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationArg {
    String(String),
    Number(f64),
    Bool(bool),
    Object(Vec<(String, AnnotationArg)>),
    Array(Vec<AnnotationArg>),
    /// An expression the host does not evaluate.
    Other,
}
