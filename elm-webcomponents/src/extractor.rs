//! Component metadata extraction.
//!
//! The [`Extractor`] walks one annotated declaration and produces a
//! [`ComponentDescriptor`] that still carries host type handles. Type
//! classification happens afterwards, in the pipeline.
//!
//! A component is declared like this:
//!
//! ```text
//! @component("my-element")
//! class MyElement extends CustomElement<{
//!   requiredEvents: { select: { id: number } };
//!   optionalEvents: { rendered: string };
//!   htmlContent: "list";
//! }> {
//!   @api({ required: true }) accessor items: Item[];
//!   @api() accessor label: string;
//! }
//! ```

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::{GenerateError, GenerateResult};
use crate::generator::GeneratorConfig;
use crate::host::{Declaration, TypeHost, TypeKind};
use crate::ir::{
    Attr, AttrList, ComponentDescriptor, HtmlContent, Slot, SlotMode, DEFAULT_SLOT_TAG,
};

/// Member of the base-class configuration listing required events.
pub const REQUIRED_EVENTS: &str = "requiredEvents";

/// Member of the base-class configuration listing optional events.
pub const OPTIONAL_EVENTS: &str = "optionalEvents";

/// Member of the base-class configuration describing child content.
pub const HTML_CONTENT: &str = "htmlContent";

/// Extracts component descriptors from annotated declarations.
#[derive(Debug)]
pub struct Extractor<'a, H> {
    host: &'a H,
    config: &'a GeneratorConfig,
}

impl<'a, H: TypeHost> Extractor<'a, H> {
    /// Create an extractor.
    pub fn new(host: &'a H, config: &'a GeneratorConfig) -> Self {
        Self { host, config }
    }

    /// Extract the descriptor of one declaration.
    ///
    /// Returns `Ok(None)` when the declaration is not annotated as a
    /// component.
    pub fn extract(
        &self,
        declaration: &Declaration<H::Type>,
    ) -> GenerateResult<Option<ComponentDescriptor<H::Type>>> {
        let Some(annotation) = declaration.annotation(&self.config.component_annotation) else {
            trace!(declaration = %declaration.name, "not a component");
            return Ok(None);
        };

        let tag_name = annotation
            .first_string_argument()
            .ok_or_else(|| GenerateError::missing_tag_name(&declaration.name))?
            .to_string();

        let (events, html_content) = match &declaration.base_type_argument {
            Some(config) => (
                self.events(declaration, config)?,
                self.html_content(declaration, config)?,
            ),
            None => (AttrList::default(), HtmlContent::None),
        };
        let properties = self.properties(declaration)?;

        debug!(
            declaration = %declaration.name,
            tag = %tag_name,
            properties = properties.required.len() + properties.optional.len(),
            events = events.required.len() + events.optional.len(),
            "extracted component"
        );

        Ok(Some(ComponentDescriptor {
            tag_name,
            module_name: self.config.module_name(&declaration.name),
            module_comment: declaration.doc.clone(),
            view_fn_name: self.config.view_function.clone(),
            properties,
            events,
            html_content,
        }))
    }

    fn properties(&self, declaration: &Declaration<H::Type>) -> GenerateResult<AttrList<H::Type>> {
        let mut properties = AttrList::default();
        let mut seen = HashSet::new();

        for member in &declaration.members {
            let Some(annotation) = member.annotation(&self.config.property_annotation) else {
                continue;
            };
            if !seen.insert(member.name.as_str()) {
                return Err(duplicate(declaration, &member.name, "property"));
            }

            let attr = Attr::new(&member.name, &member.doc, member.ty.clone());
            if annotation.flag("required") {
                properties.required.push(attr);
            } else {
                properties.optional.push(attr);
            }
        }

        Ok(properties)
    }

    fn events(
        &self,
        declaration: &Declaration<H::Type>,
        config: &H::Type,
    ) -> GenerateResult<AttrList<H::Type>> {
        let list = |member: &str| -> Vec<Attr<H::Type>> {
            self.host
                .member(config, member)
                .map(|m| self.host.members(&m.ty))
                .unwrap_or_default()
                .into_iter()
                .map(|event| Attr::new(event.name, event.doc, event.ty))
                .collect()
        };
        let events = AttrList {
            required: list(REQUIRED_EVENTS),
            optional: list(OPTIONAL_EVENTS),
        };

        let mut seen = HashSet::new();
        for event in events.iter() {
            if !seen.insert(event.name.as_str()) {
                return Err(duplicate(declaration, &event.name, "event"));
            }
        }

        Ok(events)
    }

    fn html_content(
        &self,
        declaration: &Declaration<H::Type>,
        config: &H::Type,
    ) -> GenerateResult<HtmlContent> {
        let Some(member) = self.host.member(config, HTML_CONTENT) else {
            return Ok(HtmlContent::None);
        };
        let invalid = |message: String| GenerateError::invalid_html_content(&declaration.name, message);

        match self.host.kind(&member.ty) {
            TypeKind::StringLiteral(mode) => match mode.as_str() {
                "none" => Ok(HtmlContent::None),
                "single" => Ok(HtmlContent::Single),
                "list" => Ok(HtmlContent::List),
                other => Err(invalid(format!(
                    "expected \"none\", \"single\" or \"list\", found \"{other}\""
                ))),
            },
            TypeKind::Object if self.host.array_element(&member.ty).is_none() => {
                let slots = self
                    .host
                    .members(&member.ty)
                    .into_iter()
                    .map(|slot| self.slot(slot.name, &slot.ty).map_err(&invalid))
                    .collect::<GenerateResult<Vec<_>>>()?;
                Ok(HtmlContent::Slots(slots))
            }
            _ => Err(invalid(format!(
                "expected a string literal or a slot object, found {}",
                self.host.display(&member.ty)
            ))),
        }
    }

    fn slot(&self, name: String, ty: &H::Type) -> Result<Slot, String> {
        if !matches!(self.host.kind(ty), TypeKind::Object) {
            return Err(format!(
                "slot '{name}' must be an object type, found {}",
                self.host.display(ty)
            ));
        }

        let literal = |key: &str| -> Result<Option<String>, String> {
            let Some(member) = self.host.member(ty, key) else {
                return Ok(None);
            };
            match self.host.kind(&member.ty) {
                TypeKind::StringLiteral(value) => Ok(Some(value)),
                _ => Err(format!(
                    "slot '{name}': {key} must be a string literal, found {}",
                    self.host.display(&member.ty)
                )),
            }
        };

        let mode = match literal("mode")?.as_deref() {
            None | Some("single") => SlotMode::Single,
            Some("list") => SlotMode::List,
            Some(other) => {
                return Err(format!(
                    "slot '{name}': mode must be \"single\" or \"list\", found \"{other}\""
                ))
            }
        };
        let tag = literal("tag")?.unwrap_or_else(|| DEFAULT_SLOT_TAG.to_string());

        Ok(Slot { name, mode, tag })
    }
}

fn duplicate<T>(declaration: &Declaration<T>, name: &str, kind: &'static str) -> GenerateError {
    GenerateError::DuplicateAttribute {
        declaration: declaration.name.clone(),
        name: name.to_string(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Annotation, AnnotationArg, DeclaredMember, MemoryHost, TypeId, TypeMember};

    fn component(tag: &str) -> Annotation {
        Annotation::new("component", vec![AnnotationArg::String(tag.to_string())])
    }

    fn api(required: bool) -> Annotation {
        Annotation::new(
            "api",
            vec![AnnotationArg::Object(vec![(
                "required".to_string(),
                AnnotationArg::Bool(required),
            )])],
        )
    }

    fn member(name: &str, annotations: Vec<Annotation>, ty: TypeId) -> DeclaredMember<TypeId> {
        DeclaredMember {
            name: name.to_string(),
            doc: format!("{name} doc"),
            annotations,
            ty,
        }
    }

    fn declaration(annotations: Vec<Annotation>) -> Declaration<TypeId> {
        Declaration {
            name: "MyElement".to_string(),
            doc: "An example component".to_string(),
            annotations,
            base_type_argument: None,
            members: Vec::new(),
        }
    }

    #[test]
    fn test_unannotated_declaration_is_skipped() {
        let host = MemoryHost::new();
        let config = GeneratorConfig::default();
        let result = Extractor::new(&host, &config)
            .extract(&declaration(Vec::new()))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_tag_name() {
        let host = MemoryHost::new();
        let config = GeneratorConfig::default();
        let decl = declaration(vec![Annotation::new("component", Vec::new())]);

        assert_eq!(
            Extractor::new(&host, &config).extract(&decl).unwrap_err(),
            GenerateError::missing_tag_name("MyElement")
        );
    }

    #[test]
    fn test_properties_split_and_keep_order() {
        let mut host = MemoryHost::new();
        let s = host.string();
        let config = GeneratorConfig::default();

        let mut decl = declaration(vec![component("my-element")]);
        decl.members = vec![
            member("zeta", vec![Annotation::new("api", Vec::new())], s),
            member("internal", Vec::new(), s),
            member("alpha", vec![api(true)], s),
            member("beta", vec![api(false)], s),
        ];

        let descriptor = Extractor::new(&host, &config)
            .extract(&decl)
            .unwrap()
            .unwrap();
        let required: Vec<_> = descriptor.properties.required.iter().map(|a| a.name.as_str()).collect();
        let optional: Vec<_> = descriptor.properties.optional.iter().map(|a| a.name.as_str()).collect();

        assert_eq!(descriptor.tag_name, "my-element");
        assert_eq!(descriptor.module_comment, "An example component");
        assert_eq!(required, vec!["alpha"]);
        assert_eq!(optional, vec!["zeta", "beta"]);
        assert_eq!(descriptor.properties.required[0].comment, "alpha doc");
    }

    #[test]
    fn test_duplicate_property_is_rejected() {
        let mut host = MemoryHost::new();
        let s = host.string();
        let config = GeneratorConfig::default();

        let mut decl = declaration(vec![component("my-element")]);
        decl.members = vec![member("value", vec![api(true)], s), member("value", vec![api(false)], s)];

        assert!(matches!(
            Extractor::new(&host, &config).extract(&decl),
            Err(GenerateError::DuplicateAttribute { name, kind: "property", .. }) if name == "value"
        ));
    }

    #[test]
    fn test_events_from_base_type_argument() {
        let mut host = MemoryHost::new();
        let s = host.string();
        let n = host.number();
        let required = host.record(vec![TypeMember::new("select", "Selection changed", n)]);
        let optional = host.object(&[("rendered", s), ("closed", s)]);
        let base = host.object(&[(REQUIRED_EVENTS, required), (OPTIONAL_EVENTS, optional)]);
        let config = GeneratorConfig::default();

        let mut decl = declaration(vec![component("my-element")]);
        decl.base_type_argument = Some(base);

        let descriptor = Extractor::new(&host, &config)
            .extract(&decl)
            .unwrap()
            .unwrap();
        assert_eq!(
            descriptor.events.required,
            vec![Attr::new("select", "Selection changed", n)]
        );
        let optional: Vec<_> = descriptor.events.optional.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(optional, vec!["rendered", "closed"]);
    }

    #[test]
    fn test_event_in_both_lists_is_rejected() {
        let mut host = MemoryHost::new();
        let s = host.string();
        let required = host.object(&[("change", s)]);
        let optional = host.object(&[("change", s)]);
        let base = host.object(&[(REQUIRED_EVENTS, required), (OPTIONAL_EVENTS, optional)]);
        let config = GeneratorConfig::default();

        let mut decl = declaration(vec![component("my-element")]);
        decl.base_type_argument = Some(base);

        assert!(matches!(
            Extractor::new(&host, &config).extract(&decl),
            Err(GenerateError::DuplicateAttribute { kind: "event", .. })
        ));
    }

    #[test]
    fn test_html_content_modes() {
        let config = GeneratorConfig::default();
        for (mode, expected) in [
            ("none", HtmlContent::None),
            ("single", HtmlContent::Single),
            ("list", HtmlContent::List),
        ] {
            let mut host = MemoryHost::new();
            let literal = host.string_literal(mode);
            let base = host.object(&[(HTML_CONTENT, literal)]);
            let mut decl = declaration(vec![component("my-element")]);
            decl.base_type_argument = Some(base);

            let descriptor = Extractor::new(&host, &config)
                .extract(&decl)
                .unwrap()
                .unwrap();
            assert_eq!(descriptor.html_content, expected);
        }
    }

    #[test]
    fn test_html_content_slots() {
        let mut host = MemoryHost::new();
        let list = host.string_literal("list");
        let ul = host.string_literal("ul");
        let header = host.object(&[]);
        let items = host.object(&[("mode", list), ("tag", ul)]);
        let slots = host.object(&[("header", header), ("items", items)]);
        let base = host.object(&[(HTML_CONTENT, slots)]);
        let config = GeneratorConfig::default();

        let mut decl = declaration(vec![component("my-element")]);
        decl.base_type_argument = Some(base);

        let descriptor = Extractor::new(&host, &config)
            .extract(&decl)
            .unwrap()
            .unwrap();
        assert_eq!(
            descriptor.html_content,
            HtmlContent::Slots(vec![
                Slot {
                    name: "header".to_string(),
                    mode: SlotMode::Single,
                    tag: "div".to_string(),
                },
                Slot {
                    name: "items".to_string(),
                    mode: SlotMode::List,
                    tag: "ul".to_string(),
                },
            ])
        );
    }

    #[test]
    fn test_invalid_html_content() {
        let mut host = MemoryHost::new();
        let s = host.string();
        let base = host.object(&[(HTML_CONTENT, s)]);
        let config = GeneratorConfig::default();

        let mut decl = declaration(vec![component("my-element")]);
        decl.base_type_argument = Some(base);

        assert!(matches!(
            Extractor::new(&host, &config).extract(&decl),
            Err(GenerateError::InvalidHtmlContent { .. })
        ));

        let mut host = MemoryHost::new();
        let many = host.string_literal("many");
        let base = host.object(&[(HTML_CONTENT, many)]);
        decl.base_type_argument = Some(base);
        let error = Extractor::new(&host, &config).extract(&decl).unwrap_err();
        assert!(error.to_string().contains("found \"many\""));
    }

    #[test]
    fn test_custom_annotation_names_and_prefix() {
        let mut host = MemoryHost::new();
        let s = host.string();
        let config = GeneratorConfig::new()
            .with_component_annotation("customElement")
            .with_property_annotation("prop")
            .with_view_function("render")
            .with_module_prefix("Components");

        let mut decl = declaration(vec![Annotation::new(
            "customElement",
            vec![AnnotationArg::String("x-button".to_string())],
        )]);
        decl.members = vec![member("label", vec![Annotation::new("prop", Vec::new())], s)];

        let descriptor = Extractor::new(&host, &config)
            .extract(&decl)
            .unwrap()
            .unwrap();
        assert_eq!(descriptor.module_name, "Components.MyElement");
        assert_eq!(descriptor.view_fn_name, "render");
        assert_eq!(descriptor.properties.optional.len(), 1);
    }
}
