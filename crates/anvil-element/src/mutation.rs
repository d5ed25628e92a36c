//! Generated mutations
//!
//! Provides [`GeneratedMutation`], a by-value description of a tree change
//! produced by a processor. The caller applying it owns it outright; nothing
//! produced here keeps a reference into the live tree.

use crate::element::{ElementKind, ModifierList};
use crate::path::ElementPath;
use std::fmt::{self, Display, Formatter};

/// Element a processor wants to exist
///
/// The body is opaque text: this crate never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedElement {
    kind: ElementKind,
    name: String,
    type_name: String,
    modifiers: ModifierList,
    parameters: Vec<(String, String)>,
    body: Option<String>,
}

impl GeneratedElement {
    /// Create element
    #[inline]
    #[must_use]
    pub fn new(kind: ElementKind, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            type_name: type_name.into(),
            modifiers: ModifierList::new(),
            parameters: Vec::new(),
            body: None,
        }
    }

    /// Replace modifiers
    #[inline]
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ModifierList) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add a `(name, type)` parameter
    #[inline]
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.parameters.push((name.into(), type_name.into()));
        self
    }

    /// Set body text
    #[inline]
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Element kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Element name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field type or method return type
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Modifiers
    #[inline]
    #[must_use]
    pub fn modifiers(&self) -> &ModifierList {
        &self.modifiers
    }

    /// Mutable modifiers, for annotation injection while the element is
    /// still being built
    #[inline]
    pub fn modifiers_mut(&mut self) -> &mut ModifierList {
        &mut self.modifiers
    }

    /// Parameters as `(name, type)` pairs
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// Body text
    #[inline]
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// How the element relates to the parent's existing members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationOp {
    /// Add new element under the parent
    Add,
    /// Replace the parent's element with the same name and kind
    Replace,
}

/// Description of "add/replace this element under this parent"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedMutation {
    parent: ElementPath,
    op: MutationOp,
    element: GeneratedElement,
    origin: String,
}

impl GeneratedMutation {
    /// Create mutation adding `element` under `parent`
    #[inline]
    #[must_use]
    pub fn add(parent: ElementPath, element: GeneratedElement) -> Self {
        Self {
            parent,
            op: MutationOp::Add,
            element,
            origin: String::new(),
        }
    }

    /// Create mutation replacing an existing element under `parent`
    #[inline]
    #[must_use]
    pub fn replace(parent: ElementPath, element: GeneratedElement) -> Self {
        Self {
            parent,
            op: MutationOp::Replace,
            element,
            origin: String::new(),
        }
    }

    /// Tag with the producing processor's name
    #[inline]
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Parent path
    #[inline]
    #[must_use]
    pub fn parent(&self) -> &ElementPath {
        &self.parent
    }

    /// Operation
    #[inline]
    #[must_use]
    pub fn op(&self) -> MutationOp {
        self.op
    }

    /// Generated element
    #[inline]
    #[must_use]
    pub fn element(&self) -> &GeneratedElement {
        &self.element
    }

    /// Take the generated element
    #[inline]
    #[must_use]
    pub fn into_element(self) -> GeneratedElement {
        self.element
    }

    /// Producing processor (empty if untagged)
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Path the element will have once applied
    #[inline]
    #[must_use]
    pub fn target(&self) -> ElementPath {
        self.parent.child(self.element.name())
    }
}

impl Display for GeneratedMutation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {} {}", self.op, self.element.kind(), self.target())
    }
}
