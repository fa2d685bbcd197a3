//! Error types for the generator.
//!
//! Fatal problems are reported through [`GenerateError`]; every variant
//! names the declaration it occurred in. Non-fatal findings (placeholders
//! for features that are not implemented yet) are reported as
//! [`Diagnostic`]s attached to the generated module.

use std::fmt;
use thiserror::Error;

use crate::ir::UnsupportedReason;

/// Result type alias for generator operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Error raised by an emitter for a single type expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmitError {
    /// The shape has no sound encoding.
    #[error("{reason}: {type_text}")]
    Unsupported {
        type_text: String,
        reason: String,
    },

    /// A record field cannot be expressed as an Elm record field.
    #[error("field '{name}' is not a valid Elm record field name")]
    InvalidFieldName { name: String },
}

impl EmitError {
    /// Create an unsupported-type error.
    pub fn unsupported(type_text: impl Into<String>, reason: &UnsupportedReason) -> Self {
        Self::Unsupported {
            type_text: type_text.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an error for a type parameter that was never bound.
    pub fn type_parameter(name: impl Into<String>) -> Self {
        Self::Unsupported {
            type_text: name.into(),
            reason: "unbound type parameters not supported".to_string(),
        }
    }
}

/// Fatal error for one component declaration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    /// An attribute's type (or a nested part of it) cannot be encoded.
    #[error("{component}.{attribute}: {reason}: {type_text}")]
    UnsupportedType {
        component: String,
        attribute: String,
        type_text: String,
        reason: String,
    },

    /// A record field name is not valid in the generated module.
    #[error("{component}.{attribute}: field '{field}' is not a valid Elm record field name")]
    InvalidFieldName {
        component: String,
        attribute: String,
        field: String,
    },

    /// The component annotation carries no tag name.
    #[error("{declaration}: no tag name found on the component annotation")]
    MissingTagName { declaration: String },

    /// The same name was declared twice.
    #[error("{declaration}: '{name}' is declared more than once as {kind}")]
    DuplicateAttribute {
        declaration: String,
        name: String,
        kind: &'static str,
    },

    /// The `htmlContent` configuration has an unexpected shape.
    #[error("{declaration}: invalid htmlContent: {message}")]
    InvalidHtmlContent { declaration: String, message: String },

    /// A generated name is not a valid Elm identifier.
    #[error("{component}: '{name}' cannot be used as an Elm {context}")]
    InvalidIdentifier {
        component: String,
        name: String,
        context: &'static str,
    },

    /// Two generated names clash.
    #[error("{component}: generated name '{name}' is used more than once")]
    NameCollision { component: String, name: String },
}

impl GenerateError {
    /// Attribute an emitter error to a component member.
    pub fn from_emit(component: &str, attribute: &str, error: EmitError) -> Self {
        match error {
            EmitError::Unsupported { type_text, reason } => Self::UnsupportedType {
                component: component.to_string(),
                attribute: attribute.to_string(),
                type_text,
                reason,
            },
            EmitError::InvalidFieldName { name } => Self::InvalidFieldName {
                component: component.to_string(),
                attribute: attribute.to_string(),
                field: name,
            },
        }
    }

    /// Create a missing tag name error.
    pub fn missing_tag_name(declaration: impl Into<String>) -> Self {
        Self::MissingTagName {
            declaration: declaration.into(),
        }
    }

    /// Create an invalid htmlContent error.
    pub fn invalid_html_content(declaration: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHtmlContent {
            declaration: declaration.into(),
            message: message.into(),
        }
    }
}

/// A placeholder emitted for a feature that is not implemented yet.
///
/// The generated module stays valid Elm, but the placeholder fails when the
/// affected helper is used at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Component (module) name.
    pub component: String,
    /// Property or event name.
    pub attribute: String,
    /// What is missing, e.g. `Enum Color`.
    pub feature: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}: {} is not implemented, a placeholder was generated",
            self.component, self.attribute, self.feature
        )
    }
}
