//! Syntax tree for the declaration subset of TypeScript.
//!
//! Only what type resolution and component extraction need is kept:
//! type-level declarations, classes with their decorators and property
//! members, and literal decorator arguments. Function bodies, imports and
//! other statements are skipped by the parser.

use std::fmt;

/// A parsed source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub items: Vec<Item>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    TypeAlias(TypeAlias),
    Interface(Interface),
    Enum(EnumDecl),
    Class(ClassDecl),
}

impl Item {
    /// Declared name.
    pub fn name(&self) -> &str {
        match self {
            Item::TypeAlias(a) => &a.name,
            Item::Interface(i) => &i.name,
            Item::Enum(e) => &e.name,
            Item::Class(c) => &c.name,
        }
    }
}

/// A type parameter with its optional default.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: String,
    pub default: Option<TypeExpr>,
}

/// `type Name<P> = T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: String,
    pub params: Vec<TypeParam>,
    pub ty: TypeExpr,
}

/// `interface Name<P> extends A, B { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: String,
    pub params: Vec<TypeParam>,
    pub extends: Vec<TypeExpr>,
    pub members: Vec<PropertySignature>,
    /// Why the interface cannot be read as a plain record (index or call
    /// signatures), if it cannot.
    pub opaque: Option<String>,
}

/// `enum Name { A, B = 2 }`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub members: Vec<String>,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub doc: String,
    pub decorators: Vec<Decorator>,
    pub params: Vec<TypeParam>,
    /// The `extends` clause, read as a type reference.
    pub extends: Option<TypeExpr>,
    /// Property members in declaration order. Methods are not kept.
    pub members: Vec<ClassProperty>,
}

/// A class property, including `accessor` fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProperty {
    pub name: String,
    pub doc: String,
    pub decorators: Vec<Decorator>,
    pub ty: Option<TypeExpr>,
    pub initializer: Option<Expr>,
}

/// `@name` or `@name(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    /// Last segment of the decorator expression.
    pub name: String,
    pub arguments: Vec<Expr>,
}

/// The literal expressions decorator arguments and initializers are read as.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    String(String),
    Number(f64),
    Bool(bool),
    Null,
    Undefined,
    Object(Vec<(String, Expr)>),
    Array(Vec<Expr>),
    /// Any expression that is not a literal.
    Other,
}

/// A named member of an object type or interface.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySignature {
    pub name: String,
    pub doc: String,
    pub optional: bool,
    pub ty: TypeExpr,
}

/// Keyword types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    Object,
}

impl Keyword {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "string" => Keyword::String,
            "number" => Keyword::Number,
            "boolean" => Keyword::Boolean,
            "bigint" => Keyword::BigInt,
            "symbol" => Keyword::Symbol,
            "any" => Keyword::Any,
            "unknown" => Keyword::Unknown,
            "never" => Keyword::Never,
            "void" => Keyword::Void,
            "undefined" => Keyword::Undefined,
            "null" => Keyword::Null,
            "object" => Keyword::Object,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::String => "string",
            Keyword::Number => "number",
            Keyword::Boolean => "boolean",
            Keyword::BigInt => "bigint",
            Keyword::Symbol => "symbol",
            Keyword::Any => "any",
            Keyword::Unknown => "unknown",
            Keyword::Never => "never",
            Keyword::Void => "void",
            Keyword::Undefined => "undefined",
            Keyword::Null => "null",
            Keyword::Object => "object",
        }
    }
}

/// A type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Keyword(Keyword),
    StringLiteral(String),
    NumberLiteral(f64),
    BooleanLiteral(bool),
    /// A named type, possibly qualified (`ns.Foo`), with type arguments.
    Reference { name: String, args: Vec<TypeExpr> },
    /// `T[]` and `readonly T[]`.
    Array(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Object(Vec<PropertySignature>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Function,
    /// Type syntax the reader does not model, with a short description.
    Other(String),
}

impl TypeExpr {
    pub fn reference(name: impl Into<String>) -> Self {
        TypeExpr::Reference {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Keyword(k) => f.write_str(k.as_str()),
            TypeExpr::StringLiteral(s) => write!(f, "{s:?}"),
            TypeExpr::NumberLiteral(n) => write!(f, "{n}"),
            TypeExpr::BooleanLiteral(b) => write!(f, "{b}"),
            TypeExpr::Reference { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_joined(f, args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeExpr::Array(element) => match element.as_ref() {
                TypeExpr::Union(_) | TypeExpr::Intersection(_) | TypeExpr::Function => {
                    write!(f, "({element})[]")
                }
                _ => write!(f, "{element}[]"),
            },
            TypeExpr::Tuple(elements) => {
                f.write_str("[")?;
                write_joined(f, elements, ", ")?;
                f.write_str("]")
            }
            TypeExpr::Object(members) if members.is_empty() => f.write_str("{}"),
            TypeExpr::Object(members) => {
                f.write_str("{ ")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    let optional = if member.optional { "?" } else { "" };
                    write!(f, "{}{}: {}", member.name, optional, member.ty)?;
                }
                f.write_str(" }")
            }
            TypeExpr::Union(members) => write_joined(f, members, " | "),
            TypeExpr::Intersection(members) => write_joined(f, members, " & "),
            TypeExpr::Function => f.write_str("function"),
            TypeExpr::Other(description) => f.write_str(description),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeExpr], separator: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
