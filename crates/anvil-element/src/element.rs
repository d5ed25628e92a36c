//! Program elements processors read
//!
//! A [`ContainerElement`] is a class-like scope holding [`Member`]s. Both carry
//! a [`ModifierList`] with their annotations in declaration order.

use crate::annotation::{Annotation, AnnotationIdentifier};
use crate::path::ElementPath;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Category of program element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Class, interface, enum or record
    Class,
    /// Field
    Field,
    /// Method or constructor
    Method,
    /// Method parameter
    Parameter,
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "class",
            Self::Field => "field",
            Self::Method => "method",
            Self::Parameter => "parameter",
        };
        f.write_str(name)
    }
}

/// Keywords and annotations of an element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ModifierList {
    keywords: Vec<String>,
    annotations: Vec<Annotation>,
}

impl ModifierList {
    /// Create empty modifier list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a keyword (`public`, `static`, ...)
    #[inline]
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.add_keyword(keyword);
        self
    }

    /// Add an annotation
    #[inline]
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.add_annotation(annotation);
        self
    }

    /// Append a keyword unless already present
    pub fn add_keyword(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
    }

    /// Append an annotation
    ///
    /// Duplicates are kept; callers own the order.
    #[inline]
    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Keywords in declaration order
    #[inline]
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Check for a keyword
    #[inline]
    #[must_use]
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Annotations in declaration order
    #[inline]
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// First annotation of the given type
    #[inline]
    #[must_use]
    pub fn find(&self, identifier: &AnnotationIdentifier) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.is(identifier))
    }

    /// Check for an annotation of the given type
    #[inline]
    #[must_use]
    pub fn has_annotation(&self, identifier: &AnnotationIdentifier) -> bool {
        self.find(identifier).is_some()
    }
}

/// Anything carrying annotations
pub trait Annotated {
    /// Modifier list of the element
    fn modifiers(&self) -> &ModifierList;

    /// Check for an annotation of the given type
    #[inline]
    fn is_annotated_with(&self, identifier: &AnnotationIdentifier) -> bool {
        self.modifiers().has_annotation(identifier)
    }
}

impl<T: Annotated + ?Sized> Annotated for &T {
    fn modifiers(&self) -> &ModifierList {
        (**self).modifiers()
    }
}

/// Field, method or parameter declared inside a container
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    kind: ElementKind,
    name: String,
    type_name: String,
    modifiers: ModifierList,
    parameters: Vec<Member>,
}

impl Member {
    /// Create member
    #[inline]
    #[must_use]
    pub fn new(kind: ElementKind, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            type_name: type_name.into(),
            modifiers: ModifierList::new(),
            parameters: Vec::new(),
        }
    }

    /// Create field
    #[inline]
    #[must_use]
    pub fn field(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(ElementKind::Field, name, type_name)
    }

    /// Create method; `return_type` is the declared result type
    #[inline]
    #[must_use]
    pub fn method(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self::new(ElementKind::Method, name, return_type)
    }

    /// Replace modifiers
    #[inline]
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: ModifierList) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Add an annotation
    #[inline]
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.modifiers.add_annotation(annotation);
        self
    }

    /// Add a parameter (methods only)
    #[inline]
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.parameters
            .push(Self::new(ElementKind::Parameter, name, type_name));
        self
    }

    /// Element kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Declared name
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

    /// Parameters in declaration order
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[Member] {
        &self.parameters
    }

    /// Check for a modifier keyword
    #[inline]
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.has_keyword("static")
    }
}

impl Annotated for Member {
    fn modifiers(&self) -> &ModifierList {
        &self.modifiers
    }
}

/// Class-like scope the processors run against
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerElement {
    path: ElementPath,
    modifiers: ModifierList,
    members: Vec<Member>,
}

impl ContainerElement {
    /// Create container at the given qualified path
    #[inline]
    #[must_use]
    pub fn new(path: ElementPath) -> Self {
        Self {
            path,
            modifiers: ModifierList::new(),
            members: Vec::new(),
        }
    }

    /// Add an annotation on the container itself
    #[inline]
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.modifiers.add_annotation(annotation);
        self
    }

    /// Add a member
    #[inline]
    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Qualified path; also the innermost configuration scope
    #[inline]
    #[must_use]
    pub fn path(&self) -> &ElementPath {
        &self.path
    }

    /// Simple class name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.last().unwrap_or_default()
    }

    /// Members in declaration order
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &Member> {
        self.members_of(ElementKind::Field)
    }

    /// Methods in declaration order
    pub fn methods(&self) -> impl Iterator<Item = &Member> {
        self.members_of(ElementKind::Method)
    }

    /// Members of one kind in declaration order
    pub fn members_of(&self, kind: ElementKind) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(move |m| m.kind() == kind)
    }

    /// Annotations on the container, then on each member, in declaration order
    pub fn all_annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.modifiers
            .annotations()
            .iter()
            .chain(self.members.iter().flat_map(|m| m.modifiers().annotations()))
    }
}

impl Annotated for ContainerElement {
    fn modifiers(&self) -> &ModifierList {
        &self.modifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(name: &str) -> Annotation {
        Annotation::new(name.parse().unwrap())
    }

    #[test]
    fn modifier_list_keeps_duplicate_annotations() {
        let mut list = ModifierList::new();
        list.add_annotation(annotation("java.lang.Deprecated"));
        list.add_annotation(annotation("java.lang.Deprecated"));
        assert_eq!(list.annotations().len(), 2);
    }

    #[test]
    fn modifier_list_dedupes_keywords() {
        let list = ModifierList::new()
            .with_keyword("public")
            .with_keyword("public");
        assert_eq!(list.keywords(), &["public"]);
    }

    #[test]
    fn container_all_annotations_in_declaration_order() {
        let container = ContainerElement::new("com.acme.Order".parse().unwrap())
            .with_annotation(annotation("lombok.Data"))
            .with_member(Member::field("id", "long").with_annotation(annotation("lombok.Getter")))
            .with_member(Member::field("total", "int").with_annotation(annotation("lombok.Setter")));

        let names: Vec<String> = container
            .all_annotations()
            .map(|a| a.identifier().to_string())
            .collect();
        assert_eq!(names, vec!["lombok.Data", "lombok.Getter", "lombok.Setter"]);
    }

    #[test]
    fn container_filters_members_by_kind() {
        let container = ContainerElement::new("com.acme.Order".parse().unwrap())
            .with_member(Member::field("id", "long"))
            .with_member(Member::method("getId", "long"));
        assert_eq!(container.fields().count(), 1);
        assert_eq!(container.methods().count(), 1);
        assert_eq!(container.name(), "Order");
    }

    #[test]
    fn annotated_through_reference() {
        let tolerate: AnnotationIdentifier = "lombok.experimental.Tolerate".parse().unwrap();
        let member = Member::method("getId", "long").with_annotation(Annotation::new(tolerate.clone()));
        let by_ref: &Member = &member;
        assert!(by_ref.is_annotated_with(&tolerate));
    }
}
