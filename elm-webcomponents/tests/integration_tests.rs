//! Integration tests for elm-webcomponents.
//!
//! Components are described through the in-memory host and run through the
//! whole pipeline.

use elm_webcomponents::host::{
    Annotation, AnnotationArg, Declaration, DeclaredMember, MemoryHost, TypeId, TypeMember,
};
use elm_webcomponents::{
    emit_type, Classifier, ComponentGenerator, Diagnostic, GenerateError, GeneratorConfig,
    TypeKind,
};

// =============================================================================
// Helpers
// =============================================================================

fn component(name: &str, tag: &str, doc: &str) -> Declaration<TypeId> {
    Declaration {
        name: name.to_string(),
        doc: doc.to_string(),
        annotations: vec![Annotation::new(
            "component",
            vec![AnnotationArg::String(tag.to_string())],
        )],
        base_type_argument: None,
        members: Vec::new(),
    }
}

fn api(name: &str, doc: &str, required: bool, ty: TypeId) -> DeclaredMember<TypeId> {
    let arguments = if required {
        vec![AnnotationArg::Object(vec![
            ("required".to_string(), AnnotationArg::Bool(true)),
            ("renderAfterSet".to_string(), AnnotationArg::Bool(false)),
        ])]
    } else {
        Vec::new()
    };
    DeclaredMember {
        name: name.to_string(),
        doc: doc.to_string(),
        annotations: vec![Annotation::new("api", arguments)],
        ty,
    }
}

/// The `MyElement` example: an optional and a required property, one
/// optional event and a `header` slot.
fn my_element(host: &mut MemoryHost) -> Declaration<TypeId> {
    let s = host.string();
    let n = host.number();
    let foo = host.record(vec![
        TypeMember::new("bar", "bar comment", s),
        TypeMember::new("baz", "", n),
    ]);
    let foo = host.name(foo, "Foo");

    let rendered = host.object(&[("foo", s)]);
    let optional_events = host.record(vec![TypeMember::new("Rendered", "foo comment", rendered)]);
    let single = host.string_literal("single");
    let header = host.object(&[("mode", single)]);
    let slots = host.object(&[("header", header)]);
    let base = host.object(&[("optionalEvents", optional_events), ("htmlContent", slots)]);

    let mut declaration = component("MyElement", "my-element", "Some doc comment");
    declaration.base_type_argument = Some(base);
    declaration.members = vec![
        api("myProp", "Some more comments", false, s),
        api("otherProp", "Some comments", true, foo),
    ];
    declaration
}

// =============================================================================
// Type emission
// =============================================================================

#[test]
fn test_simple_types_convert_exactly() {
    let mut host = MemoryHost::new();
    let s = host.string();
    let n = host.number();
    let b = host.boolean();
    let foo_record = host.object(&[("foo", s)]);
    let numbers = host.array(n);
    let with_numbers = host.object(&[("foo", numbers)]);
    let list_of_records = host.array(with_numbers);

    let cases = [
        (s, "String"),
        (n, "Float"),
        (b, "Bool"),
        (foo_record, "{ foo : String }"),
        (numbers, "List (Float)"),
        (list_of_records, "List ({ foo : List (Float) })"),
    ];

    let classifier = Classifier::new(&host);
    for (ty, expected) in cases {
        assert_eq!(emit_type(&classifier.classify(&ty)).unwrap(), expected);
    }
}

// =============================================================================
// Whole modules
// =============================================================================

#[test]
fn test_my_element_module() {
    let mut host = MemoryHost::new();
    let declaration = my_element(&mut host);
    let generator = ComponentGenerator::new(&host, GeneratorConfig::default());

    let module = generator.generate(&declaration).unwrap().unwrap();
    assert_eq!(module.relative_path, "MyElement.elm");
    assert!(module.diagnostics.is_empty());
    insta::assert_snapshot!(module.content, @r#"
module MyElement exposing (view, myProp, onRendered)

{-| Some doc comment

@docs view, myProp, onRendered

-}

import Html exposing (Attribute, Html)
import Html.Attributes
import Html.Events
import Json.Decode as Decode
import Json.Encode as Encode


{-| Some more comments
-}
myProp : String -> Attribute msg
myProp val =
    Html.Attributes.property "myProp" (Encode.string val)


{-| foo comment
-}
onRendered : ({ foo : String } -> msg) -> Attribute msg
onRendered tagger =
    Html.Events.on "Rendered" (Decode.map tagger (Decode.field "detail" (Decode.succeed (\arg0 -> { foo = arg0 }) |> Decode.map2 (|>) (Decode.field "foo" Decode.string))))


{-| Render a `my-element` element.
-}
view : List (Attribute msg) -> { otherProp : { bar : String, baz : Float }, header : Html msg } -> Html msg
view attrs req =
    Html.node "my-element"
        (Html.Attributes.property "otherProp" (Encode.object [ ( "bar", Encode.string req.otherProp.bar ), ( "baz", Encode.float req.otherProp.baz ) ]) :: attrs)
        [ Html.node "div" [ Html.Attributes.attribute "slot" "header" ] [ req.header ] ]
"#);
}

#[test]
fn test_module_prefix_and_view_name() {
    let mut host = MemoryHost::new();
    let declaration = my_element(&mut host);
    let config = GeneratorConfig::new()
        .with_module_prefix("Components.")
        .with_view_function("myElement");
    let generator = ComponentGenerator::new(&host, config);

    let module = generator.generate(&declaration).unwrap().unwrap();
    assert_eq!(module.module_name, "Components.MyElement");
    assert_eq!(module.relative_path, "Components/MyElement.elm");
    assert!(module
        .content
        .starts_with("module Components.MyElement exposing (myElement, myProp, onRendered)\n"));
    assert!(module.content.contains("\nmyElement attrs req =\n"));
}

#[test]
fn test_placeholders_are_diagnostics() {
    let mut host = MemoryHost::new();
    let s = host.string();
    let b = host.boolean();
    let placeholder = host.object(&[("name", s), ("type", s), ("dataType", s)]);
    let placeholder = host.name(placeholder, "Placeholder");
    let placeholders = host.array(placeholder);
    let null = host.add(TypeKind::Null);
    let value = host.union(vec![placeholder, null]);

    let mut declaration = component("ReactyThing", "reacty-thing", "");
    declaration.members = vec![
        api("disabled", "", true, b),
        api("value", "", true, value),
    ];

    let generator = ComponentGenerator::new(&host, GeneratorConfig::default());
    let module = generator.generate(&declaration).unwrap().unwrap();
    assert_eq!(
        module.diagnostics,
        vec![Diagnostic {
            component: "ReactyThing".to_string(),
            attribute: "value".to_string(),
            feature: "Union Placeholder | null".to_string(),
        }]
    );
    assert!(module
        .content
        .contains("view : { disabled : Bool, value : Never } -> Html msg\n"));
    assert!(module.content.contains(
        "Html.Attributes.property \"value\" \
         (Debug.todo \"Union Placeholder | null is not implemented for encoders\")"
    ));

    // `type` is a reserved word in Elm: the record field is renamed, the
    // JSON key is not.
    declaration.members.push(api("placeholders", "", true, placeholders));
    let module = generator.generate(&declaration).unwrap().unwrap();
    assert!(module
        .content
        .contains("placeholders : List ({ name : String, type_ : String, dataType : String })"));
    assert!(module
        .content
        .contains("( \"type\", Encode.string el.type_ )"));
}

#[test]
fn test_unsupported_type_fails_declaration() {
    let mut host = MemoryHost::new();
    let symbol = host.add(TypeKind::Symbol);
    let record = host.object(&[("id", symbol)]);
    let list = host.array(record);

    let mut declaration = component("Broken", "x-broken", "");
    declaration.members = vec![api("items", "", false, list)];

    let generator = ComponentGenerator::new(&host, GeneratorConfig::default());
    let error = generator.generate(&declaration).unwrap_err();
    assert_eq!(
        error,
        GenerateError::UnsupportedType {
            component: "Broken".to_string(),
            attribute: "items".to_string(),
            type_text: "symbol".to_string(),
            reason: "symbol type not supported".to_string(),
        }
    );
}

#[test]
fn test_declarations_are_independent() {
    let mut host = MemoryHost::new();
    let good = my_element(&mut host);
    let any = host.add(TypeKind::Any);
    let mut bad = component("Bad", "x-bad", "");
    bad.members = vec![api("value", "", false, any)];

    let generator = ComponentGenerator::new(&host, GeneratorConfig::default());
    let results: Vec<_> = [&bad, &good]
        .into_iter()
        .map(|d| generator.generate(d))
        .collect();

    assert!(results[0].is_err());
    assert!(matches!(&results[1], Ok(Some(module)) if module.module_name == "MyElement"));
}
