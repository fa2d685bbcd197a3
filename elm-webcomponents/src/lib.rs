//! # elm-webcomponents
//!
//! Type-directed generation of Elm bindings for decorated web components.
//!
//! Given a component declaration such as
//!
//! ```text
//! @component("my-element")
//! class MyElement extends CustomElement<{ optionalEvents: { rendered: { foo: string } } }> {
//!   @api({ required: true }) accessor items: { label: string }[];
//!   @api() accessor value: number;
//! }
//! ```
//!
//! this crate produces an Elm module `MyElement` exposing a `view` function
//! plus one accessor per optional property and one `on<Event>` helper per
//! optional event, with JSON encoders and decoders derived from the types.
//!
//! ## Architecture
//!
//! - [`host`] - the read-only [`TypeHost`] interface and the declaration model
//! - [`classifier`] - turns host types into the closed [`Shape`] IR
//! - [`ir`] - shapes and component descriptors
//! - [`extractor`] - finds component metadata on annotated declarations
//! - [`generator`] - Elm emitters and the module formatter
//! - [`pipeline`] - extract, classify and format one declaration
//! - [`error`] - fatal errors and non-fatal diagnostics
//!
//! ## Usage
//!
//! ```rust
//! use elm_webcomponents::host::{Annotation, AnnotationArg, Declaration, DeclaredMember, MemoryHost};
//! use elm_webcomponents::{ComponentGenerator, GeneratorConfig};
//!
//! let mut host = MemoryHost::new();
//! let label = host.string();
//!
//! let declaration = Declaration {
//!     name: "MyButton".to_string(),
//!     doc: String::new(),
//!     annotations: vec![Annotation::new(
//!         "component",
//!         vec![AnnotationArg::String("my-button".to_string())],
//!     )],
//!     base_type_argument: None,
//!     members: vec![DeclaredMember {
//!         name: "label".to_string(),
//!         doc: String::new(),
//!         annotations: vec![Annotation::new("api", Vec::new())],
//!         ty: label,
//!     }],
//! };
//!
//! let generator = ComponentGenerator::new(&host, GeneratorConfig::default());
//! let module = generator.generate(&declaration)?.expect("annotated as a component");
//! assert!(module.content.contains("label : String -> Attribute msg"));
//! # Ok::<(), elm_webcomponents::GenerateError>(())
//! ```

pub mod classifier;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod host;
pub mod ir;
pub mod pipeline;

// Re-export main types for convenience
pub use classifier::Classifier;
pub use error::{Diagnostic, EmitError, GenerateError, GenerateResult};
pub use extractor::Extractor;
pub use generator::elm::{emit_decoder, emit_encoder, emit_type, ElmModuleFormatter};
pub use generator::{GeneratedModule, GeneratorConfig};
pub use host::{TypeHost, TypeKind, TypeMember};
pub use ir::{ComponentDescriptor, Shape};
pub use pipeline::ComponentGenerator;
