//! Hand-maintained member filtering
//!
//! A member carrying the tolerate marker is invisible to "does this member
//! already exist" checks: it neither suppresses generation nor raises a
//! conflict. Filter candidate sets before any such check.

use anvil_element::{Annotated, AnnotationIdentifier};

/// Removes tolerated members from candidate sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToleratedElementFilter {
    marker: AnnotationIdentifier,
}

impl Default for ToleratedElementFilter {
    fn default() -> Self {
        Self::new(Self::default_marker())
    }
}

impl ToleratedElementFilter {
    /// Create filter for a custom marker
    #[inline]
    #[must_use]
    pub fn new(marker: AnnotationIdentifier) -> Self {
        Self { marker }
    }

    /// `lombok.experimental.Tolerate`
    #[must_use]
    pub fn default_marker() -> AnnotationIdentifier {
        AnnotationIdentifier::from_segments("lombok", &["experimental", "Tolerate"])
    }

    /// Marker this filter removes
    #[inline]
    #[must_use]
    pub fn marker(&self) -> &AnnotationIdentifier {
        &self.marker
    }

    /// Check a single element
    #[inline]
    #[must_use]
    pub fn is_tolerated<T: Annotated + ?Sized>(&self, element: &T) -> bool {
        element.is_annotated_with(&self.marker)
    }

    /// Remove tolerated candidates in place, keeping the others in order
    pub fn filter_tolerated<T: Annotated>(&self, candidates: &mut Vec<T>) {
        let before = candidates.len();
        candidates.retain(|candidate| !self.is_tolerated(candidate));
        let removed = before - candidates.len();
        if removed > 0 {
            tracing::trace!(removed, marker = %self.marker, "tolerated members filtered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_element::{Annotation, Member};

    fn tolerated(name: &str) -> Member {
        Member::method(name, "void")
            .with_annotation(Annotation::new(ToleratedElementFilter::default_marker()))
    }

    #[test]
    fn removes_only_marked_members_in_order() {
        let filter = ToleratedElementFilter::default();
        let mut candidates = vec![
            Member::method("getA", "int"),
            tolerated("getB"),
            Member::method("getC", "int"),
            tolerated("getD"),
        ];
        filter.filter_tolerated(&mut candidates);

        let names: Vec<&str> = candidates.iter().map(Member::name).collect();
        assert_eq!(names, vec!["getA", "getC"]);
    }

    #[test]
    fn works_on_borrowed_candidates() {
        let filter = ToleratedElementFilter::default();
        let members = [tolerated("getB"), Member::method("getC", "int")];
        let mut candidates: Vec<&Member> = members.iter().collect();
        filter.filter_tolerated(&mut candidates);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name(), "getC");
    }

    #[test]
    fn empty_set_is_noop() {
        let filter = ToleratedElementFilter::default();
        let mut candidates: Vec<Member> = Vec::new();
        filter.filter_tolerated(&mut candidates);
        assert!(candidates.is_empty());
    }

    #[test]
    fn custom_marker() {
        let marker: AnnotationIdentifier = "com.acme.Handwritten".parse().unwrap();
        let filter = ToleratedElementFilter::new(marker.clone());
        let mut candidates = vec![
            tolerated("getB"),
            Member::method("getC", "int").with_annotation(Annotation::new(marker)),
        ];
        filter.filter_tolerated(&mut candidates);
        let names: Vec<&str> = candidates.iter().map(Member::name).collect();
        assert_eq!(names, vec!["getB"]);
    }
}
