//! Elm module formatter.
//!
//! [`ElmModuleFormatter`] assembles one complete module per component, in a
//! fixed order:
//!
//! 1. module header exposing the view function, every optional property
//!    accessor and every optional event helper, with an `@docs` line
//! 2. the imports the module actually uses
//! 3. one accessor per optional property
//! 4. one `on<Event>` helper per optional event
//! 5. the primary view function
//!
//! Every attribute is run through the emitters before any text is
//! assembled, so a rejected type never leaves a partial module behind.

use std::collections::HashSet;

use convert_case::{Case, Casing};
use tracing::debug;

use super::naming::{arg, is_lower_identifier, is_module_name, string_literal};
use super::{emit_decoder, emit_encoder, emit_type};
use crate::error::{Diagnostic, GenerateError, GenerateResult};
use crate::generator::GeneratedModule;
use crate::ir::{Attr, ComponentDescriptor, HtmlContent, Shape, Slot, SlotMode};

/// Parameter and binding names used inside generated functions.
const LOCAL_NAMES: &[&str] = &["attrs", "req", "child", "children", "val", "tagger"];

/// Builds Elm modules from classified component descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElmModuleFormatter;

impl ElmModuleFormatter {
    /// Create a new formatter.
    pub fn new() -> Self {
        Self
    }

    /// Format one component as a complete Elm module.
    pub fn format(&self, descriptor: &ComponentDescriptor<Shape>) -> GenerateResult<GeneratedModule> {
        check_names(descriptor)?;
        let rendered = Rendered::new(descriptor)?;
        let content = assemble(descriptor, &rendered);

        let diagnostics = diagnostics(descriptor);
        debug!(
            module = %descriptor.module_name,
            placeholders = diagnostics.len(),
            "formatted module"
        );

        Ok(GeneratedModule {
            module_name: descriptor.module_name.clone(),
            relative_path: relative_path(&descriptor.module_name),
            content,
            diagnostics,
        })
    }
}

/// Name of the helper (or required record field) for an event.
///
/// `value-changed` becomes `onValueChanged`.
pub fn event_helper_name(event: &str) -> String {
    format!("on{}", event.to_case(Case::Pascal))
}

/// `Components.MyElement` becomes `Components/MyElement.elm`.
pub fn relative_path(module_name: &str) -> String {
    format!("{}.elm", module_name.replace('.', "/"))
}

fn is_local_name(name: &str) -> bool {
    let numbered = |prefix: &str, allow_bare: bool| {
        name.strip_prefix(prefix).is_some_and(|rest| {
            (allow_bare || !rest.is_empty()) && rest.chars().all(|c| c.is_ascii_digit())
        })
    };
    LOCAL_NAMES.contains(&name) || numbered("el", true) || numbered("arg", false)
}

fn check_names(descriptor: &ComponentDescriptor<Shape>) -> GenerateResult<()> {
    let component = descriptor.module_name.as_str();
    let invalid = |name: &str, context: &'static str| GenerateError::InvalidIdentifier {
        component: component.to_string(),
        name: name.to_string(),
        context,
    };
    let collision = |name: &str| GenerateError::NameCollision {
        component: component.to_string(),
        name: name.to_string(),
    };

    if !is_module_name(component) {
        return Err(invalid(component, "module name"));
    }

    // Top-level functions share one namespace and must not be shadowed by
    // the parameters of generated functions.
    let mut exposed = HashSet::new();
    for name in exposed_names(descriptor) {
        if !is_lower_identifier(&name) {
            return Err(invalid(&name, "function name"));
        }
        if is_local_name(&name) || !exposed.insert(name.clone()) {
            return Err(collision(&name));
        }
    }

    let mut fields = HashSet::new();
    for name in required_field_names(descriptor) {
        if !is_lower_identifier(&name) {
            return Err(invalid(&name, "record field"));
        }
        if !fields.insert(name.clone()) {
            return Err(collision(&name));
        }
    }

    Ok(())
}

fn exposed_names(descriptor: &ComponentDescriptor<Shape>) -> Vec<String> {
    std::iter::once(descriptor.view_fn_name.clone())
        .chain(descriptor.properties.optional.iter().map(|p| p.name.clone()))
        .chain(
            descriptor
                .events
                .optional
                .iter()
                .map(|e| event_helper_name(&e.name)),
        )
        .collect()
}

fn required_field_names(descriptor: &ComponentDescriptor<Shape>) -> Vec<String> {
    let slots = match &descriptor.html_content {
        HtmlContent::Slots(slots) => slots.as_slice(),
        _ => &[],
    };
    descriptor
        .properties
        .required
        .iter()
        .map(|p| p.name.clone())
        .chain(
            descriptor
                .events
                .required
                .iter()
                .map(|e| event_helper_name(&e.name)),
        )
        .chain(slots.iter().map(|s| s.name.clone()))
        .collect()
}

fn diagnostics(descriptor: &ComponentDescriptor<Shape>) -> Vec<Diagnostic> {
    descriptor
        .properties
        .iter()
        .chain(descriptor.events.iter())
        .flat_map(|attr| {
            attr.ty.placeholders().into_iter().map(|p| Diagnostic {
                component: descriptor.module_name.clone(),
                attribute: attr.name.clone(),
                feature: p.feature,
            })
        })
        .collect()
}

/// A property with its emitted type and encoder.
struct Property<'d> {
    attr: &'d Attr<Shape>,
    ty: String,
    encoder: String,
}

/// An event with its helper name, emitted type and decoder.
struct Event<'d> {
    attr: &'d Attr<Shape>,
    helper: String,
    ty: String,
    decoder: String,
}

/// Emitter output for every attribute of a descriptor.
struct Rendered<'d> {
    required_properties: Vec<Property<'d>>,
    optional_properties: Vec<Property<'d>>,
    required_events: Vec<Event<'d>>,
    optional_events: Vec<Event<'d>>,
}

impl<'d> Rendered<'d> {
    fn new(descriptor: &'d ComponentDescriptor<Shape>) -> GenerateResult<Self> {
        let component = descriptor.module_name.as_str();

        let required_properties = descriptor
            .properties
            .required
            .iter()
            .map(|attr| Property::new(component, attr, &format!("req.{}", attr.name)))
            .collect::<GenerateResult<Vec<_>>>()?;
        let optional_properties = descriptor
            .properties
            .optional
            .iter()
            .map(|attr| Property::new(component, attr, "val"))
            .collect::<GenerateResult<Vec<_>>>()?;
        let required_events = descriptor
            .events
            .required
            .iter()
            .map(|attr| Event::new(component, attr))
            .collect::<GenerateResult<Vec<_>>>()?;
        let optional_events = descriptor
            .events
            .optional
            .iter()
            .map(|attr| Event::new(component, attr))
            .collect::<GenerateResult<Vec<_>>>()?;

        Ok(Self {
            required_properties,
            optional_properties,
            required_events,
            optional_events,
        })
    }

    fn takes_attrs(&self) -> bool {
        !self.optional_properties.is_empty() || !self.optional_events.is_empty()
    }
}

impl<'d> Property<'d> {
    fn new(component: &str, attr: &'d Attr<Shape>, value: &str) -> GenerateResult<Self> {
        let attribute = |e| GenerateError::from_emit(component, &attr.name, e);
        Ok(Self {
            attr,
            ty: emit_type(&attr.ty).map_err(attribute)?,
            encoder: emit_encoder(&attr.ty, value).map_err(attribute)?,
        })
    }

    /// `Html.Attributes.property "name" (<encoder>)`
    fn attribute(&self) -> String {
        format!(
            "Html.Attributes.property {} {}",
            string_literal(&self.attr.name),
            arg(&self.encoder)
        )
    }
}

impl<'d> Event<'d> {
    fn new(component: &str, attr: &'d Attr<Shape>) -> GenerateResult<Self> {
        let attribute = |e| GenerateError::from_emit(component, &attr.name, e);
        let ty = emit_type(&attr.ty).map_err(attribute)?;
        let payload = emit_decoder(&attr.ty).map_err(attribute)?;
        Ok(Self {
            attr,
            helper: event_helper_name(&attr.name),
            ty,
            // Events are dispatched as `CustomEvent`s carrying their payload
            // in `detail`.
            decoder: format!("Decode.field \"detail\" {}", arg(&payload)),
        })
    }

    /// `Html.Events.on "name" (Decode.map <tagger> (<decoder>))`
    fn attribute(&self, tagger: &str) -> String {
        format!(
            "Html.Events.on {} (Decode.map {} {})",
            string_literal(&self.attr.name),
            tagger,
            arg(&self.decoder)
        )
    }
}

fn assemble(descriptor: &ComponentDescriptor<Shape>, rendered: &Rendered<'_>) -> String {
    let exposing = exposed_names(descriptor).join(", ");

    let mut blocks = Vec::new();
    for property in &rendered.optional_properties {
        blocks.push(property_accessor(property));
    }
    for event in &rendered.optional_events {
        blocks.push(event_helper(event));
    }
    blocks.push(view_function(descriptor, rendered));

    format!(
        "module {} exposing ({})\n\n{}\n\n{}\n\n\n{}\n",
        descriptor.module_name,
        exposing,
        module_doc(&descriptor.module_comment, &exposing),
        imports(descriptor, rendered).join("\n"),
        blocks.join("\n\n\n")
    )
}

fn imports(descriptor: &ComponentDescriptor<Shape>, rendered: &Rendered<'_>) -> Vec<&'static str> {
    let has_slots = matches!(&descriptor.html_content, HtmlContent::Slots(s) if !s.is_empty());
    let has_properties = !descriptor.properties.is_empty();
    let has_events = !descriptor.events.is_empty();

    let mut imports = Vec::new();
    if rendered.takes_attrs() {
        imports.push("import Html exposing (Attribute, Html)");
    } else {
        imports.push("import Html exposing (Html)");
    }
    if has_properties || has_slots {
        imports.push("import Html.Attributes");
    }
    if has_events {
        imports.push("import Html.Events");
        imports.push("import Json.Decode as Decode");
    }
    if has_properties {
        imports.push("import Json.Encode as Encode");
    }
    imports
}

/// Make text safe to place inside an Elm block comment.
fn comment_text(comment: &str) -> String {
    comment
        .trim()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .replace("-}", "- }")
        .replace("{-", "{ -")
}

fn doc_comment(comment: &str) -> String {
    let text = comment_text(comment);
    if text.is_empty() {
        "{-| -}".to_string()
    } else {
        format!("{{-| {text}\n-}}")
    }
}

fn module_doc(comment: &str, exposing: &str) -> String {
    let text = comment_text(comment);
    if text.is_empty() {
        format!("{{-|\n\n@docs {exposing}\n\n-}}")
    } else {
        format!("{{-| {text}\n\n@docs {exposing}\n\n-}}")
    }
}

fn property_accessor(property: &Property<'_>) -> String {
    let name = &property.attr.name;
    format!(
        "{doc}\n{name} : {ty} -> Attribute msg\n{name} val =\n    {body}",
        doc = doc_comment(&property.attr.comment),
        ty = property.ty,
        body = property.attribute(),
    )
}

fn event_helper(event: &Event<'_>) -> String {
    let helper = &event.helper;
    format!(
        "{doc}\n{helper} : ({ty} -> msg) -> Attribute msg\n{helper} tagger =\n    {body}",
        doc = doc_comment(&event.attr.comment),
        ty = event.ty,
        body = event.attribute("tagger"),
    )
}

fn view_function(descriptor: &ComponentDescriptor<Shape>, rendered: &Rendered<'_>) -> String {
    let slots = match &descriptor.html_content {
        HtmlContent::Slots(slots) => slots.as_slice(),
        _ => &[],
    };

    let mut params: Vec<(&str, String)> = Vec::new();
    if rendered.takes_attrs() {
        params.push(("attrs", "List (Attribute msg)".to_string()));
    }
    if descriptor.has_required_record() {
        params.push(("req", required_record_type(rendered, slots)));
    }
    match &descriptor.html_content {
        HtmlContent::Single => params.push(("child", "Html msg".to_string())),
        HtmlContent::List => params.push(("children", "List (Html msg)".to_string())),
        HtmlContent::None | HtmlContent::Slots(_) => {}
    }

    let name = &descriptor.view_fn_name;
    let signature = params
        .iter()
        .map(|(_, ty)| ty.as_str())
        .chain(std::iter::once("Html msg"))
        .collect::<Vec<_>>()
        .join(" -> ");
    let head = std::iter::once(name.as_str())
        .chain(params.iter().map(|(param, _)| *param))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{doc}\n{name} : {signature}\n{head} =\n    Html.node {tag}\n        {attrs}\n        {children}",
        doc = doc_comment(&format!("Render a `{}` element.", descriptor.tag_name)),
        tag = string_literal(&descriptor.tag_name),
        attrs = attribute_list(rendered),
        children = child_list(&descriptor.html_content),
    )
}

fn required_record_type(rendered: &Rendered<'_>, slots: &[Slot]) -> String {
    let fields: Vec<String> = rendered
        .required_properties
        .iter()
        .map(|p| format!("{} : {}", p.attr.name, p.ty))
        .chain(
            rendered
                .required_events
                .iter()
                .map(|e| format!("{} : {} -> msg", e.helper, e.ty)),
        )
        .chain(slots.iter().map(|s| match s.mode {
            SlotMode::Single => format!("{} : Html msg", s.name),
            SlotMode::List => format!("{} : List (Html msg)", s.name),
        }))
        .collect();
    format!("{{ {} }}", fields.join(", "))
}

/// Required attributes consed ahead of the optional ones, or a list literal
/// when the view takes no attribute list.
fn attribute_list(rendered: &Rendered<'_>) -> String {
    let required: Vec<String> = rendered
        .required_properties
        .iter()
        .map(Property::attribute)
        .chain(
            rendered
                .required_events
                .iter()
                .map(|e| e.attribute(&format!("req.{}", e.helper))),
        )
        .collect();

    match (rendered.takes_attrs(), required.is_empty()) {
        (true, true) => "attrs".to_string(),
        (true, false) => format!("({} :: attrs)", required.join(" :: ")),
        (false, true) => "[]".to_string(),
        (false, false) => format!("[ {} ]", required.join(", ")),
    }
}

fn child_list(content: &HtmlContent) -> String {
    match content {
        HtmlContent::None => "[]".to_string(),
        HtmlContent::Single => "[ child ]".to_string(),
        HtmlContent::List => "children".to_string(),
        HtmlContent::Slots(slots) if slots.is_empty() => "[]".to_string(),
        HtmlContent::Slots(slots) => {
            let nodes: Vec<String> = slots.iter().map(slot_node).collect();
            format!("[ {} ]", nodes.join(", "))
        }
    }
}

fn slot_node(slot: &Slot) -> String {
    let content = match slot.mode {
        SlotMode::Single => format!("[ req.{} ]", slot.name),
        SlotMode::List => format!("req.{}", slot.name),
    };
    format!(
        "Html.node {} [ Html.Attributes.attribute \"slot\" {} ] {}",
        string_literal(&slot.tag),
        string_literal(&slot.name),
        content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AttrList, Field, Unsupported, UnsupportedReason, DEFAULT_SLOT_TAG};
    use pretty_assertions::assert_eq;

    fn descriptor() -> ComponentDescriptor<Shape> {
        ComponentDescriptor {
            tag_name: "my-element".to_string(),
            module_name: "MyElement".to_string(),
            module_comment: "An example component".to_string(),
            view_fn_name: "view".to_string(),
            properties: AttrList::default(),
            events: AttrList::default(),
            html_content: HtmlContent::None,
        }
    }

    #[test]
    fn test_full_module_layout() {
        let mut d = descriptor();
        d.properties.required.push(Attr::new("count", "", Shape::number()));
        d.properties
            .optional
            .push(Attr::new("label", "Text shown", Shape::string()));
        d.events
            .optional
            .push(Attr::new("value-changed", "Fired on change", Shape::string()));

        let module = ElmModuleFormatter::new().format(&d).unwrap();
        assert_eq!(module.relative_path, "MyElement.elm");
        assert_eq!(
            module.content,
            r#"module MyElement exposing (view, label, onValueChanged)

{-| An example component

@docs view, label, onValueChanged

-}

import Html exposing (Attribute, Html)
import Html.Attributes
import Html.Events
import Json.Decode as Decode
import Json.Encode as Encode


{-| Text shown
-}
label : String -> Attribute msg
label val =
    Html.Attributes.property "label" (Encode.string val)


{-| Fired on change
-}
onValueChanged : (String -> msg) -> Attribute msg
onValueChanged tagger =
    Html.Events.on "value-changed" (Decode.map tagger (Decode.field "detail" Decode.string))


{-| Render a `my-element` element.
-}
view : List (Attribute msg) -> { count : Float } -> Html msg
view attrs req =
    Html.node "my-element"
        (Html.Attributes.property "count" (Encode.float req.count) :: attrs)
        []
"#
        );
    }

    #[test]
    fn test_bare_component_has_no_parameters() {
        let mut d = descriptor();
        d.module_comment = String::new();

        let module = ElmModuleFormatter::new().format(&d).unwrap();
        assert_eq!(
            module.content,
            r#"module MyElement exposing (view)

{-|

@docs view

-}

import Html exposing (Html)


{-| Render a `my-element` element.
-}
view : Html msg
view =
    Html.node "my-element"
        []
        []
"#
        );
    }

    #[test]
    fn test_required_only_uses_list_literal() {
        let mut d = descriptor();
        d.properties.required.push(Attr::new("a", "", Shape::string()));
        d.properties.required.push(Attr::new("b", "", Shape::boolean()));

        let content = ElmModuleFormatter::new().format(&d).unwrap().content;
        assert!(content.contains("view : { a : String, b : Bool } -> Html msg\nview req =\n"));
        assert!(content.contains(
            "        [ Html.Attributes.property \"a\" (Encode.string req.a), \
             Html.Attributes.property \"b\" (Encode.bool req.b) ]\n"
        ));
        assert!(content.contains("import Html exposing (Html)\n"));
    }

    #[test]
    fn test_optional_only_passes_attrs_through() {
        let mut d = descriptor();
        d.properties.optional.push(Attr::new("a", "", Shape::string()));

        let content = ElmModuleFormatter::new().format(&d).unwrap().content;
        assert!(content.contains("view : List (Attribute msg) -> Html msg\nview attrs =\n"));
        assert!(content.contains("\n        attrs\n        []\n"));
    }

    #[test]
    fn test_optional_events_only_take_attrs() {
        let mut d = descriptor();
        d.events.optional.push(Attr::new("opened", "", Shape::boolean()));

        let content = ElmModuleFormatter::new().format(&d).unwrap().content;
        assert!(content.starts_with("module MyElement exposing (view, onOpened)\n"));
        assert!(content.contains("\nonOpened : (Bool -> msg) -> Attribute msg\n"));
        assert!(content.contains("view : List (Attribute msg) -> Html msg\nview attrs =\n"));
        assert!(content.contains("\n        attrs\n        []\n"));
    }

    #[test]
    fn test_required_event_is_a_record_field() {
        let mut d = descriptor();
        d.events.required.push(Attr::new(
            "select",
            "",
            Shape::Record(vec![Field::new("id", Shape::number())]),
        ));

        let content = ElmModuleFormatter::new().format(&d).unwrap().content;
        assert!(content.contains("view : { onSelect : { id : Float } -> msg } -> Html msg\n"));
        assert!(content.contains(
            "[ Html.Events.on \"select\" (Decode.map req.onSelect (Decode.field \"detail\" \
             (Decode.succeed (\\arg0 -> { id = arg0 }) |> Decode.map2 (|>) (Decode.field \"id\" Decode.float)))) ]"
        ));
    }

    #[test]
    fn test_child_content() {
        let mut d = descriptor();
        d.html_content = HtmlContent::Single;
        let content = ElmModuleFormatter::new().format(&d).unwrap().content;
        assert!(content.contains("view : Html msg -> Html msg\nview child =\n"));
        assert!(content.ends_with("        []\n        [ child ]\n"));

        d.html_content = HtmlContent::List;
        let content = ElmModuleFormatter::new().format(&d).unwrap().content;
        assert!(content.contains("view : List (Html msg) -> Html msg\nview children =\n"));
        assert!(content.ends_with("        []\n        children\n"));
    }

    #[test]
    fn test_slots_become_record_fields() {
        let mut d = descriptor();
        d.html_content = HtmlContent::Slots(vec![
            Slot {
                name: "header".to_string(),
                mode: SlotMode::Single,
                tag: DEFAULT_SLOT_TAG.to_string(),
            },
            Slot {
                name: "items".to_string(),
                mode: SlotMode::List,
                tag: "ul".to_string(),
            },
        ]);

        let content = ElmModuleFormatter::new().format(&d).unwrap().content;
        assert!(content.contains(
            "view : { header : Html msg, items : List (Html msg) } -> Html msg\nview req =\n"
        ));
        assert!(content.contains(
            "[ Html.node \"div\" [ Html.Attributes.attribute \"slot\" \"header\" ] [ req.header ], \
             Html.node \"ul\" [ Html.Attributes.attribute \"slot\" \"items\" ] req.items ]"
        ));
        assert!(content.contains("import Html.Attributes\n"));
    }

    #[test]
    fn test_unsupported_type_fails_whole_module() {
        let mut d = descriptor();
        d.properties.optional.push(Attr::new("ok", "", Shape::string()));
        d.properties.optional.push(Attr::new(
            "value",
            "",
            Shape::Unsupported(Unsupported {
                reason: UnsupportedReason::Any,
                type_text: "any".to_string(),
            }),
        ));

        let error = ElmModuleFormatter::new().format(&d).unwrap_err();
        assert_eq!(
            error,
            GenerateError::UnsupportedType {
                component: "MyElement".to_string(),
                attribute: "value".to_string(),
                type_text: "any".to_string(),
                reason: "any type not supported".to_string(),
            }
        );
    }

    #[test]
    fn test_placeholders_are_reported() {
        let mut d = descriptor();
        d.properties.optional.push(Attr::new(
            "color",
            "",
            Shape::Enum {
                name: "Color".to_string(),
            },
        ));

        let module = ElmModuleFormatter::new().format(&d).unwrap();
        assert!(module.content.contains("color : Never -> Attribute msg\n"));
        assert_eq!(
            module.diagnostics,
            vec![Diagnostic {
                component: "MyElement".to_string(),
                attribute: "color".to_string(),
                feature: "Enum Color".to_string(),
            }]
        );
    }

    #[test]
    fn test_name_collisions() {
        let mut d = descriptor();
        d.properties.optional.push(Attr::new("view", "", Shape::string()));
        assert!(matches!(
            ElmModuleFormatter::new().format(&d),
            Err(GenerateError::NameCollision { name, .. }) if name == "view"
        ));

        let mut d = descriptor();
        d.properties.optional.push(Attr::new("val", "", Shape::string()));
        assert!(matches!(
            ElmModuleFormatter::new().format(&d),
            Err(GenerateError::NameCollision { name, .. }) if name == "val"
        ));

        let mut d = descriptor();
        d.properties.optional.push(Attr::new("el2", "", Shape::string()));
        assert!(matches!(
            ElmModuleFormatter::new().format(&d),
            Err(GenerateError::NameCollision { .. })
        ));
    }

    #[test]
    fn test_invalid_identifiers() {
        let mut d = descriptor();
        d.properties.optional.push(Attr::new("type", "", Shape::string()));
        assert!(matches!(
            ElmModuleFormatter::new().format(&d),
            Err(GenerateError::InvalidIdentifier { context: "function name", .. })
        ));

        let mut d = descriptor();
        d.module_name = "my-element".to_string();
        assert!(matches!(
            ElmModuleFormatter::new().format(&d),
            Err(GenerateError::InvalidIdentifier { context: "module name", .. })
        ));
    }

    #[test]
    fn test_doc_comments_are_neutralized() {
        assert_eq!(doc_comment("closes -} early"), "{-| closes - } early\n-}");
        assert_eq!(doc_comment("  "), "{-| -}");
    }

    #[test]
    fn test_event_helper_names() {
        assert_eq!(event_helper_name("value-changed"), "onValueChanged");
        assert_eq!(event_helper_name("Rendered"), "onRendered");
        assert_eq!(event_helper_name("click"), "onClick");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("Components.MyElement"), "Components/MyElement.elm");
    }

    #[test]
    fn test_local_names() {
        assert!(is_local_name("el"));
        assert!(is_local_name("el10"));
        assert!(is_local_name("arg0"));
        assert!(!is_local_name("arg"));
        assert!(!is_local_name("element"));
    }
}
