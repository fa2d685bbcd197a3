//! Code generator module.
//!
//! This module holds the generator configuration and output types, and the
//! Elm backend that turns classified component descriptors into modules.

pub mod elm;

use crate::error::Diagnostic;

/// Default name of the component annotation.
pub const DEFAULT_COMPONENT_ANNOTATION: &str = "component";

/// Default name of the property annotation.
pub const DEFAULT_PROPERTY_ANNOTATION: &str = "api";

/// Default name of the primary view function.
pub const DEFAULT_VIEW_FUNCTION: &str = "view";

/// Generator configuration options.
///
/// Controls which annotations mark components and properties, and how the
/// generated modules are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Annotation that marks a declaration as a component.
    pub component_annotation: String,

    /// Annotation that marks a member as a component property.
    pub property_annotation: String,

    /// Name of the primary view function in every module.
    pub view_function: String,

    /// Prefix prepended to every module name, e.g. `Components`.
    pub module_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            component_annotation: DEFAULT_COMPONENT_ANNOTATION.to_string(),
            property_annotation: DEFAULT_PROPERTY_ANNOTATION.to_string(),
            view_function: DEFAULT_VIEW_FUNCTION.to_string(),
            module_prefix: String::new(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the component annotation name.
    pub fn with_component_annotation(mut self, name: impl Into<String>) -> Self {
        self.component_annotation = name.into();
        self
    }

    /// Set the property annotation name.
    pub fn with_property_annotation(mut self, name: impl Into<String>) -> Self {
        self.property_annotation = name.into();
        self
    }

    /// Set the view function name.
    pub fn with_view_function(mut self, name: impl Into<String>) -> Self {
        self.view_function = name.into();
        self
    }

    /// Set the module name prefix.
    pub fn with_module_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.module_prefix = prefix.into();
        self
    }

    /// Full module name for a declaration.
    ///
    /// A trailing `.` on the prefix is optional.
    pub fn module_name(&self, declaration: &str) -> String {
        let prefix = self.module_prefix.trim_end_matches('.');
        if prefix.is_empty() {
            declaration.to_string()
        } else {
            format!("{prefix}.{declaration}")
        }
    }
}

/// One generated Elm module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    /// Dotted module name, e.g. `Components.MyElement`.
    pub module_name: String,

    /// Path of the module file relative to the source root,
    /// e.g. `Components/MyElement.elm`.
    pub relative_path: String,

    /// Complete module source.
    pub content: String,

    /// Placeholders emitted while generating this module.
    pub diagnostics: Vec<Diagnostic>,
}
