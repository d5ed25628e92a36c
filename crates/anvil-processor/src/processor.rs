//! Processor contract
//!
//! A [`Processor`] declares which annotations trigger it and what kind of
//! element it produces, then turns a container element into a list of
//! [`GeneratedMutation`]s. Processors never mutate the tree themselves and
//! never fail: problems are reported as [`Diagnostic`]s next to whatever
//! could still be produced.
//!
//! Everything a processor needs at processing time comes through the
//! [`ProcessingContext`], so implementations stay free of global state.

use crate::diagnostic::Diagnostic;
use crate::error::ProcessorResult;
use crate::inject::AnnotationInjector;
use crate::matching::AnnotationMatchSet;
use crate::parser::AnnotationParser;
use crate::resolver::ConfigResolver;
use crate::settings::GlobalSettings;
use crate::tolerate::ToleratedElementFilter;
use anvil_config::{ConfigKey, ScopedConfig};
use anvil_element::{
    Annotation, AnnotationIdentifier, ContainerElement, ElementKind, ElementPath,
    GeneratedMutation, Member,
};

/// Static dispatch metadata of a processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorDescriptor {
    annotations: AnnotationMatchSet,
    target_kind: ElementKind,
}

impl ProcessorDescriptor {
    /// Create descriptor from trigger identifiers, primary first
    ///
    /// # Errors
    /// - [`crate::ProcessorError::NoSupportedAnnotations`] for zero identifiers
    /// - [`crate::ProcessorError::TooManyAnnotations`] for more than three distinct ones
    pub fn new(
        target_kind: ElementKind,
        identifiers: impl IntoIterator<Item = AnnotationIdentifier>,
    ) -> ProcessorResult<Self> {
        Ok(Self {
            annotations: AnnotationMatchSet::new(identifiers)?,
            target_kind,
        })
    }

    /// Create descriptor from qualified names, primary first
    ///
    /// # Errors
    /// Same as [`Self::new`], plus [`crate::ProcessorError::InvalidIdentifier`]
    pub fn parse(target_kind: ElementKind, names: &[&str]) -> ProcessorResult<Self> {
        Ok(Self {
            annotations: AnnotationMatchSet::parse(names)?,
            target_kind,
        })
    }

    /// Trigger annotations
    #[inline]
    #[must_use]
    pub fn annotations(&self) -> &AnnotationMatchSet {
        &self.annotations
    }

    /// Kind of element the processor generates
    #[inline]
    #[must_use]
    pub fn target_kind(&self) -> ElementKind {
        self.target_kind
    }
}

/// How a processor's generated code touches an annotated field
///
/// Ordered by strength so the strongest usage wins when several processors
/// answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementUsage {
    /// Field not referenced
    #[default]
    None,
    /// Field read (e.g. by a getter)
    Read,
    /// Field read and written (e.g. by a setter)
    ReadWrite,
}

/// Result of one `process` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Changes to apply to the tree, in generation order
    pub mutations: Vec<GeneratedMutation>,
    /// Problems found while generating
    pub diagnostics: Vec<Diagnostic>,
}

impl ProcessOutput {
    /// Create empty output
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Output with a single diagnostic and no mutations
    #[must_use]
    pub fn from_diagnostic(diagnostic: Diagnostic) -> Self {
        Self {
            mutations: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }

    /// Append mutation
    #[inline]
    pub fn push_mutation(&mut self, mutation: GeneratedMutation) {
        self.mutations.push(mutation);
    }

    /// Append diagnostic
    #[inline]
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append several diagnostics
    #[inline]
    pub fn extend_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Check for no mutations and no diagnostics
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty() && self.diagnostics.is_empty()
    }

    /// Check for any error diagnostic
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Collaborators available during `process`
#[derive(Clone, Copy)]
pub struct ProcessingContext<'a> {
    config: &'a dyn ScopedConfig,
    parser: &'a dyn AnnotationParser,
    tolerated: &'a ToleratedElementFilter,
    settings: &'a GlobalSettings,
}

impl std::fmt::Debug for ProcessingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessingContext")
            .field("tolerated", self.tolerated)
            .field("settings", self.settings)
            .finish_non_exhaustive()
    }
}

impl<'a> ProcessingContext<'a> {
    /// Create context
    #[inline]
    #[must_use]
    pub fn new(
        config: &'a dyn ScopedConfig,
        parser: &'a dyn AnnotationParser,
        tolerated: &'a ToleratedElementFilter,
        settings: &'a GlobalSettings,
    ) -> Self {
        Self {
            config,
            parser,
            tolerated,
            settings,
        }
    }

    /// Scoped configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &'a dyn ScopedConfig {
        self.config
    }

    /// Annotation text parser
    #[inline]
    #[must_use]
    pub fn parser(&self) -> &'a dyn AnnotationParser {
        self.parser
    }

    /// Tolerated-member filter
    #[inline]
    #[must_use]
    pub fn tolerated(&self) -> &'a ToleratedElementFilter {
        self.tolerated
    }

    /// Global settings
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &'a GlobalSettings {
        self.settings
    }

    /// Flag resolver over the scoped configuration
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> ConfigResolver<'a> {
        ConfigResolver::new(self.config)
    }

    /// Injector using the context's parser
    #[inline]
    #[must_use]
    pub fn injector(&self) -> AnnotationInjector<'a> {
        AnnotationInjector::new(self.parser)
    }

    /// Shorthand for [`ConfigResolver::resolve_boolean`]
    #[inline]
    #[must_use]
    pub fn resolve_boolean(
        &self,
        annotation: &Annotation,
        scope: &ElementPath,
        parameter: &str,
        key: &ConfigKey,
    ) -> bool {
        self.resolver()
            .resolve_boolean(annotation, scope, parameter, key)
    }

    /// Members of `kind` that count as already defined
    ///
    /// Tolerated members are excluded.
    #[must_use]
    pub fn existing_members<'c>(
        &self,
        container: &'c ContainerElement,
        kind: ElementKind,
    ) -> Vec<&'c Member> {
        let mut members: Vec<&Member> = container.members_of(kind).collect();
        self.tolerated.filter_tolerated(&mut members);
        members
    }
}

/// Pluggable unit reacting to a fixed set of annotations
///
/// # Contract
/// - [`Self::supported_annotations`] is non-empty and never changes.
/// - [`Self::is_enabled`] has no side effects.
/// - [`Self::process`] is deterministic: structurally equal inputs give
///   structurally equal outputs, and every mutation it returns has
///   [`Self::supported_target_kind`] as its element kind.
pub trait Processor: Send + Sync + std::fmt::Debug {
    /// Dispatch metadata
    fn descriptor(&self) -> &ProcessorDescriptor;

    /// Name used in diagnostics, logs and mutation origins
    fn name(&self) -> &str;

    /// Trigger annotations
    fn supported_annotations(&self) -> &AnnotationMatchSet {
        self.descriptor().annotations()
    }

    /// Kind of element this processor generates
    fn supported_target_kind(&self) -> ElementKind {
        self.descriptor().target_kind()
    }

    /// Whether the host settings enable this processor
    fn is_enabled(&self, _settings: &GlobalSettings) -> bool {
        true
    }

    /// Trigger annotations present in `container`, in declaration order
    ///
    /// [`AnnotationMatchSet::collect_from`] covers the common case.
    fn collect_matched_annotations<'c>(&self, container: &'c ContainerElement)
        -> Vec<&'c Annotation>;

    /// Generate mutations for `container`
    fn process(&self, _container: &ContainerElement, _ctx: &ProcessingContext<'_>) -> ProcessOutput {
        ProcessOutput::default()
    }

    /// How generated code for `annotation` uses `field`
    fn check_field_usage(&self, _field: &Member, _annotation: &Annotation) -> ElementUsage {
        ElementUsage::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessorError;
    use crate::parser::TextAnnotationParser;
    use anvil_config::DefaultsOnly;

    #[derive(Debug)]
    struct Marker {
        descriptor: ProcessorDescriptor,
    }

    impl Processor for Marker {
        fn descriptor(&self) -> &ProcessorDescriptor {
            &self.descriptor
        }

        fn name(&self) -> &str {
            "marker"
        }

        fn collect_matched_annotations<'c>(
            &self,
            container: &'c ContainerElement,
        ) -> Vec<&'c Annotation> {
            self.supported_annotations().collect_from(container)
        }
    }

    fn id(s: &str) -> AnnotationIdentifier {
        s.parse().unwrap()
    }

    #[test]
    fn descriptor_rejects_empty_and_oversized_sets() {
        assert_eq!(
            ProcessorDescriptor::new(ElementKind::Method, Vec::new()).unwrap_err(),
            ProcessorError::NoSupportedAnnotations
        );
        assert_eq!(
            ProcessorDescriptor::parse(ElementKind::Method, &["a.A", "a.B", "a.C", "a.D"])
                .unwrap_err(),
            ProcessorError::TooManyAnnotations { count: 4, max: 3 }
        );
    }

    #[test]
    fn descriptor_dedups_before_counting() {
        let descriptor =
            ProcessorDescriptor::parse(ElementKind::Field, &["a.A", "a.B", "a.A", "a.C"]).unwrap();
        assert_eq!(descriptor.annotations().len(), 3);
        assert_eq!(descriptor.annotations().primary(), &id("a.A"));
    }

    #[test]
    fn defaults_are_inert() {
        let marker = Marker {
            descriptor: ProcessorDescriptor::parse(ElementKind::Method, &["com.acme.Mark"])
                .unwrap(),
        };
        let container = ContainerElement::new("com.acme.Order".parse().unwrap())
            .with_annotation(Annotation::new(id("com.acme.Mark")));
        let parser = TextAnnotationParser;
        let tolerated = ToleratedElementFilter::default();
        let settings = GlobalSettings::default();
        let ctx = ProcessingContext::new(&DefaultsOnly, &parser, &tolerated, &settings);

        assert!(marker.is_enabled(&settings));
        assert_eq!(marker.supported_target_kind(), ElementKind::Method);
        assert_eq!(marker.collect_matched_annotations(&container).len(), 1);
        assert!(marker.process(&container, &ctx).is_empty());
        assert_eq!(
            marker.check_field_usage(&Member::field("id", "long"), &Annotation::new(id("com.acme.Mark"))),
            ElementUsage::None
        );
    }

    #[test]
    fn existing_members_skip_tolerated() {
        let parser = TextAnnotationParser;
        let tolerated = ToleratedElementFilter::default();
        let settings = GlobalSettings::default();
        let ctx = ProcessingContext::new(&DefaultsOnly, &parser, &tolerated, &settings);

        let container = ContainerElement::new("com.acme.Order".parse().unwrap())
            .with_member(Member::field("id", "long"))
            .with_member(Member::method("getId", "long"))
            .with_member(
                Member::method("getIdLegacy", "long")
                    .with_annotation(Annotation::new(ToleratedElementFilter::default_marker())),
            );

        let existing = ctx.existing_members(&container, ElementKind::Method);
        let names: Vec<&str> = existing.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["getId"]);
    }

    #[test]
    fn usage_orders_by_strength() {
        assert!(ElementUsage::ReadWrite > ElementUsage::Read);
        assert!(ElementUsage::Read > ElementUsage::None);
        assert_eq!(ElementUsage::default(), ElementUsage::None);
    }
}
