//! Component descriptor IR.
//!
//! A [`ComponentDescriptor`] holds everything extracted from one annotated
//! declaration. It is generic over the type payload of its attributes: the
//! extractor fills it with host type handles, and [`ComponentDescriptor::map_types`]
//! swaps those for materialized [`Shape`](crate::ir::Shape)s before formatting.

use serde::Serialize;

/// One typed, documented member (property or event).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attr<T> {
    /// Member name, unique within its descriptor list.
    pub name: String,
    /// Documentation comment, possibly empty.
    pub comment: String,
    /// Type payload.
    pub ty: T,
}

impl<T> Attr<T> {
    /// Create an attribute.
    pub fn new(name: impl Into<String>, comment: impl Into<String>, ty: T) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
            ty,
        }
    }

    fn map<U, E>(self, f: &mut impl FnMut(&str, T) -> Result<U, E>) -> Result<Attr<U>, E> {
        let ty = f(&self.name, self.ty)?;
        Ok(Attr {
            name: self.name,
            comment: self.comment,
            ty,
        })
    }
}

/// Required and optional attributes, each in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttrList<T> {
    pub required: Vec<Attr<T>>,
    pub optional: Vec<Attr<T>>,
}

impl<T> Default for AttrList<T> {
    fn default() -> Self {
        Self {
            required: Vec::new(),
            optional: Vec::new(),
        }
    }
}

impl<T> AttrList<T> {
    /// True when both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }

    /// Required then optional attributes.
    pub fn iter(&self) -> impl Iterator<Item = &Attr<T>> {
        self.required.iter().chain(self.optional.iter())
    }

    fn try_map<U, E>(self, f: &mut impl FnMut(&str, T) -> Result<U, E>) -> Result<AttrList<U>, E> {
        Ok(AttrList {
            required: self
                .required
                .into_iter()
                .map(|a| a.map(&mut *f))
                .collect::<Result<_, _>>()?,
            optional: self
                .optional
                .into_iter()
                .map(|a| a.map(&mut *f))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// How the component accepts child markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum HtmlContent {
    /// No children.
    #[default]
    None,
    /// Exactly one child node.
    Single,
    /// A list of child nodes.
    List,
    /// Named slots passed through the required record.
    Slots(Vec<Slot>),
}

/// A named content slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub name: String,
    pub mode: SlotMode,
    /// Wrapper element carrying the `slot` attribute.
    pub tag: String,
}

/// Number of nodes a slot takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SlotMode {
    #[default]
    Single,
    List,
}

/// Default wrapper element for slotted content.
pub const DEFAULT_SLOT_TAG: &str = "div";

/// Extracted metadata for one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentDescriptor<T> {
    /// Custom element tag name.
    pub tag_name: String,
    /// Name of the generated module.
    pub module_name: String,
    /// Module documentation.
    pub module_comment: String,
    /// Name of the primary view function.
    pub view_fn_name: String,
    pub properties: AttrList<T>,
    pub events: AttrList<T>,
    pub html_content: HtmlContent,
}

impl<T> ComponentDescriptor<T> {
    /// Replace every attribute payload, preserving order.
    ///
    /// The closure receives the attribute name alongside its payload so
    /// failures can be attributed.
    pub fn map_types<U, E>(
        self,
        mut f: impl FnMut(&str, T) -> Result<U, E>,
    ) -> Result<ComponentDescriptor<U>, E> {
        Ok(ComponentDescriptor {
            tag_name: self.tag_name,
            module_name: self.module_name,
            module_comment: self.module_comment,
            view_fn_name: self.view_fn_name,
            properties: self.properties.try_map(&mut f)?,
            events: self.events.try_map(&mut f)?,
            html_content: self.html_content,
        })
    }

    /// True when the view function takes a record of required fields.
    pub fn has_required_record(&self) -> bool {
        !self.properties.required.is_empty()
            || !self.events.required.is_empty()
            || matches!(&self.html_content, HtmlContent::Slots(slots) if !slots.is_empty())
    }
}
