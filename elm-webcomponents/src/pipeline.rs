//! Per-declaration generation pipeline.
//!
//! extract → classify every property and event type → format.

use tracing::debug;

use crate::classifier::Classifier;
use crate::error::{EmitError, GenerateError, GenerateResult};
use crate::extractor::Extractor;
use crate::generator::elm::ElmModuleFormatter;
use crate::generator::{GeneratedModule, GeneratorConfig};
use crate::host::{Declaration, TypeHost};
use crate::ir::Shape;

/// Generates one Elm module per component declaration.
#[derive(Debug)]
pub struct ComponentGenerator<'h, H> {
    host: &'h H,
    config: GeneratorConfig,
    formatter: ElmModuleFormatter,
}

impl<'h, H: TypeHost> ComponentGenerator<'h, H> {
    /// Create a generator over a host.
    pub fn new(host: &'h H, config: GeneratorConfig) -> Self {
        Self {
            host,
            config,
            formatter: ElmModuleFormatter::new(),
        }
    }

    /// Generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the module for one declaration.
    ///
    /// Returns `Ok(None)` for declarations that are not components. Types
    /// are classified once, up front; a type that can never be encoded
    /// fails the declaration before any Elm text is produced.
    pub fn generate(
        &self,
        declaration: &Declaration<H::Type>,
    ) -> GenerateResult<Option<GeneratedModule>> {
        let extractor = Extractor::new(self.host, &self.config);
        let Some(descriptor) = extractor.extract(declaration)? else {
            return Ok(None);
        };

        let classifier = Classifier::new(self.host);
        let component = descriptor.module_name.clone();
        let descriptor = descriptor
            .map_types(|attribute, ty| classify(&classifier, &component, attribute, &ty))?;

        let module = self.formatter.format(&descriptor)?;
        debug!(
            declaration = %declaration.name,
            module = %module.module_name,
            "generated module"
        );
        Ok(Some(module))
    }
}

fn classify<H: TypeHost>(
    classifier: &Classifier<'_, H>,
    component: &str,
    attribute: &str,
    ty: &H::Type,
) -> GenerateResult<Shape> {
    let shape = classifier.classify(ty);
    let rejection = match shape.first_rejected() {
        Some(Shape::Unsupported(unsupported)) => {
            Some(EmitError::unsupported(&unsupported.type_text, &unsupported.reason))
        }
        Some(Shape::TypeParameter { name }) => Some(EmitError::type_parameter(name)),
        _ => None,
    };

    match rejection {
        Some(error) => Err(GenerateError::from_emit(component, attribute, error)),
        None => Ok(shape),
    }
}
