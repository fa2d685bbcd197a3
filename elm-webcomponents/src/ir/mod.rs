//! Intermediate Representation (IR) module.
//!
//! This module defines the target-agnostic data structures the generator
//! works on: [`Shape`] for types and [`ComponentDescriptor`] for the
//! metadata of one component.

pub mod descriptor;
pub mod shape;

pub use descriptor::{
    Attr, AttrList, ComponentDescriptor, HtmlContent, Slot, SlotMode, DEFAULT_SLOT_TAG,
};
pub use shape::{Field, LiteralValue, Placeholder, PrimitiveKind, Shape, Unsupported, UnsupportedReason};
