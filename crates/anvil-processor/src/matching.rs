//! Trigger annotation sets
//!
//! Provides [`AnnotationMatchSet`], the fixed list of annotation types a
//! processor reacts to. The first entry is the primary trigger; the others
//! are equivalents that match identically and differ only in diagnostics.

use crate::error::{ProcessorError, ProcessorResult};
use anvil_element::{Annotated, Annotation, AnnotationIdentifier, ContainerElement};
use smallvec::SmallVec;

/// Role of an identifier within its match set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRole {
    /// First identifier of the set
    Primary,
    /// Any later identifier
    Equivalent,
}

/// Ordered, de-duplicated set of 1 to [`AnnotationMatchSet::MAX`] identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationMatchSet {
    identifiers: SmallVec<[AnnotationIdentifier; 3]>,
}

impl AnnotationMatchSet {
    /// Upper bound on identifiers per processor
    pub const MAX: usize = 3;

    /// Build from identifiers, primary first
    ///
    /// Repeated identifiers are dropped, keeping the first occurrence.
    ///
    /// # Errors
    /// - [`ProcessorError::NoSupportedAnnotations`] if `identifiers` is empty
    /// - [`ProcessorError::TooManyAnnotations`] if more than [`Self::MAX`] remain
    pub fn new(
        identifiers: impl IntoIterator<Item = AnnotationIdentifier>,
    ) -> ProcessorResult<Self> {
        let mut unique: SmallVec<[AnnotationIdentifier; 3]> = SmallVec::new();
        for identifier in identifiers {
            if !unique.contains(&identifier) {
                unique.push(identifier);
            }
        }

        if unique.is_empty() {
            return Err(ProcessorError::NoSupportedAnnotations);
        }
        if unique.len() > Self::MAX {
            return Err(ProcessorError::TooManyAnnotations {
                count: unique.len(),
                max: Self::MAX,
            });
        }

        Ok(Self {
            identifiers: unique,
        })
    }

    /// Build from qualified names, primary first
    ///
    /// # Errors
    /// Same as [`Self::new`], plus [`ProcessorError::InvalidIdentifier`]
    pub fn parse(names: &[&str]) -> ProcessorResult<Self> {
        let identifiers = names
            .iter()
            .map(|name| {
                name.parse()
                    .map_err(|source| ProcessorError::InvalidIdentifier {
                        text: (*name).to_string(),
                        source,
                    })
            })
            .collect::<ProcessorResult<Vec<_>>>()?;
        Self::new(identifiers)
    }

    /// Primary trigger
    #[inline]
    #[must_use]
    pub fn primary(&self) -> &AnnotationIdentifier {
        &self.identifiers[0]
    }

    /// Equivalent triggers, in declaration order
    #[inline]
    #[must_use]
    pub fn equivalents(&self) -> &[AnnotationIdentifier] {
        &self.identifiers[1..]
    }

    /// All identifiers, primary first
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &AnnotationIdentifier> {
        self.identifiers.iter()
    }

    /// Number of identifiers (always at least one)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Always `false`; present for API symmetry with `len`
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Membership test; equivalents match like the primary
    #[inline]
    #[must_use]
    pub fn contains(&self, identifier: &AnnotationIdentifier) -> bool {
        self.identifiers.contains(identifier)
    }

    /// Check whether `annotation` is one of the triggers
    #[inline]
    #[must_use]
    pub fn matches(&self, annotation: &Annotation) -> bool {
        self.contains(annotation.identifier())
    }

    /// Role of `identifier`, or `None` if not in the set
    #[must_use]
    pub fn role_of(&self, identifier: &AnnotationIdentifier) -> Option<MatchRole> {
        let index = self.identifiers.iter().position(|i| i == identifier)?;
        Some(if index == 0 {
            MatchRole::Primary
        } else {
            MatchRole::Equivalent
        })
    }

    /// Check if `identifier` is the primary trigger
    #[inline]
    #[must_use]
    pub fn is_primary(&self, identifier: &AnnotationIdentifier) -> bool {
        self.primary() == identifier
    }

    /// Matching annotations on `element` itself, in declaration order
    #[must_use]
    pub fn collect_on<'a, E: Annotated + ?Sized>(&self, element: &'a E) -> Vec<&'a Annotation> {
        element
            .modifiers()
            .annotations()
            .iter()
            .filter(|a| self.matches(a))
            .collect()
    }

    /// Matching annotations on the container and then on each member, in
    /// declaration order
    ///
    /// Every occurrence is returned, including a primary and an equivalent
    /// on the same element.
    #[must_use]
    pub fn collect_from<'a>(&self, container: &'a ContainerElement) -> Vec<&'a Annotation> {
        container
            .all_annotations()
            .filter(|a| self.matches(a))
            .collect()
    }

    /// Pick a single trigger from matched annotations
    ///
    /// The primary wins if present; otherwise the first equivalent in the
    /// order given.
    #[must_use]
    pub fn select_trigger<'a>(&self, matched: &[&'a Annotation]) -> Option<&'a Annotation> {
        matched
            .iter()
            .find(|a| self.is_primary(a.identifier()))
            .or_else(|| matched.iter().find(|a| self.matches(a)))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_element::Member;

    fn id(s: &str) -> AnnotationIdentifier {
        s.parse().unwrap()
    }

    fn getter_set() -> AnnotationMatchSet {
        AnnotationMatchSet::parse(&["lombok.Getter", "lombok.experimental.Getter"]).unwrap()
    }

    #[test]
    fn empty_set_fails_fast() {
        let err = AnnotationMatchSet::new(Vec::new()).unwrap_err();
        assert_eq!(err, ProcessorError::NoSupportedAnnotations);
    }

    #[test]
    fn more_than_three_rejected() {
        let err = AnnotationMatchSet::parse(&["a.A", "a.B", "a.C", "a.D"]).unwrap_err();
        assert_eq!(err, ProcessorError::TooManyAnnotations { count: 4, max: 3 });
    }

    #[test]
    fn duplicates_are_dropped_before_bound_check() {
        let set = AnnotationMatchSet::parse(&["a.A", "a.B", "a.A", "a.C"]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.primary(), &id("a.A"));
        assert_eq!(set.equivalents(), &[id("a.B"), id("a.C")]);
    }

    #[test]
    fn invalid_identifier_reported() {
        let err = AnnotationMatchSet::parse(&["lombok..Getter"]).unwrap_err();
        assert!(matches!(err, ProcessorError::InvalidIdentifier { ref text, .. } if text == "lombok..Getter"));
    }

    #[test]
    fn roles() {
        let set = getter_set();
        assert_eq!(set.role_of(&id("lombok.Getter")), Some(MatchRole::Primary));
        assert_eq!(
            set.role_of(&id("lombok.experimental.Getter")),
            Some(MatchRole::Equivalent)
        );
        assert_eq!(set.role_of(&id("lombok.Setter")), None);
    }

    #[test]
    fn collect_finds_equivalents_like_primary() {
        let set = getter_set();
        let container = ContainerElement::new("com.acme.Order".parse().unwrap())
            .with_member(
                Member::field("id", "long")
                    .with_annotation(Annotation::new(id("lombok.experimental.Getter"))),
            )
            .with_member(Member::field("name", "String").with_annotation(Annotation::new(id("lombok.Getter"))))
            .with_member(Member::field("note", "String").with_annotation(Annotation::new(id("lombok.Setter"))));

        let found: Vec<String> = set
            .collect_from(&container)
            .iter()
            .map(|a| a.identifier().to_string())
            .collect();
        assert_eq!(found, vec!["lombok.experimental.Getter", "lombok.Getter"]);
    }

    #[test]
    fn select_trigger_prefers_primary() {
        let set = getter_set();
        let equivalent = Annotation::new(id("lombok.experimental.Getter"));
        let primary = Annotation::new(id("lombok.Getter"));

        let picked = set.select_trigger(&[&equivalent, &primary]).unwrap();
        assert!(picked.is(&id("lombok.Getter")));

        let picked = set.select_trigger(&[&equivalent]).unwrap();
        assert!(picked.is(&id("lombok.experimental.Getter")));

        assert!(set.select_trigger(&[]).is_none());
    }
}
