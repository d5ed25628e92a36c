//! Processor registry and dispatcher
//!
//! Holds processors in registration order and indexes them by every
//! identifier in their match set. [`ProcessorRegistry::dispatch`] runs each
//! enabled processor whose triggers appear in a container and gathers the
//! resulting mutations and diagnostics.

use crate::diagnostic::Diagnostic;
use crate::parser::{AnnotationParser, TextAnnotationParser};
use crate::processor::{ElementUsage, ProcessingContext, Processor};
use crate::settings::GlobalSettings;
use crate::tolerate::ToleratedElementFilter;
use anvil_config::ScopedConfig;
use anvil_element::{Annotated, AnnotationIdentifier, ContainerElement, GeneratedMutation, Member};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Everything one dispatch produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Accepted mutations, tagged with their origin, in registration order
    pub mutations: Vec<GeneratedMutation>,
    /// Diagnostics from processors and from the dispatcher
    pub diagnostics: Vec<Diagnostic>,
    /// Names of processors that ran
    pub processed: Vec<String>,
}

impl DispatchOutcome {
    /// Check for any error diagnostic
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Registered processors plus the shared collaborators they run with
pub struct ProcessorRegistry {
    processors: Vec<Arc<dyn Processor>>,
    index: IndexMap<AnnotationIdentifier, SmallVec<[usize; 2]>>,
    parser: Arc<dyn AnnotationParser>,
    tolerated: ToleratedElementFilter,
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("processors", &self.names())
            .field("indexed_annotations", &self.index.len())
            .field("tolerated", &self.tolerated)
            .finish_non_exhaustive()
    }
}

impl ProcessorRegistry {
    /// Create empty registry with the text parser and default tolerate marker
    #[must_use]
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
            index: IndexMap::new(),
            parser: Arc::new(TextAnnotationParser),
            tolerated: ToleratedElementFilter::default(),
        }
    }

    /// Replace the annotation text parser
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn AnnotationParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the tolerated-member filter
    #[must_use]
    pub fn with_tolerated(mut self, tolerated: ToleratedElementFilter) -> Self {
        self.tolerated = tolerated;
        self
    }

    /// Register a processor under every identifier it supports
    pub fn register(&mut self, processor: Arc<dyn Processor>) {
        let slot = self.processors.len();
        for identifier in processor.supported_annotations().iter() {
            self.index.entry(identifier.clone()).or_default().push(slot);
        }
        tracing::debug!(
            processor = processor.name(),
            annotations = processor.supported_annotations().len(),
            target = %processor.supported_target_kind(),
            "processor registered"
        );
        self.processors.push(processor);
    }

    /// Number of registered processors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Check if no processor is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Processor names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// All processors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Processor>> {
        self.processors.iter()
    }

    /// Processors triggered by `identifier`, in registration order
    pub fn processors_for<'s>(
        &'s self,
        identifier: &AnnotationIdentifier,
    ) -> impl Iterator<Item = &'s Arc<dyn Processor>> + 's {
        self.index
            .get(identifier)
            .into_iter()
            .flatten()
            .map(move |&slot| &self.processors[slot])
    }

    /// Tolerated-member filter handed to processors
    #[inline]
    #[must_use]
    pub fn tolerated(&self) -> &ToleratedElementFilter {
        &self.tolerated
    }

    /// Slots of processors with at least one trigger in `container`
    fn candidates(&self, container: &ContainerElement) -> BTreeSet<usize> {
        container
            .all_annotations()
            .filter_map(|annotation| self.index.get(annotation.identifier()))
            .flatten()
            .copied()
            .collect()
    }

    /// Run every enabled, triggered processor on `container`
    ///
    /// Mutations whose element kind differs from the producing processor's
    /// target kind are dropped and reported as errors.
    pub fn dispatch(
        &self,
        container: &ContainerElement,
        settings: &GlobalSettings,
        config: &dyn ScopedConfig,
    ) -> DispatchOutcome {
        let ctx = ProcessingContext::new(config, &*self.parser, &self.tolerated, settings);
        let mut outcome = DispatchOutcome::default();

        for slot in self.candidates(container) {
            let processor = &self.processors[slot];
            let name = processor.name();

            if !settings.allows(name) || !processor.is_enabled(settings) {
                tracing::debug!(processor = name, container = %container.path(), "processor disabled");
                continue;
            }

            let matched = processor.collect_matched_annotations(container);
            let Some(first) = matched.first() else {
                continue;
            };
            tracing::debug!(
                processor = name,
                container = %container.path(),
                matched = matched.len(),
                "dispatching"
            );

            let output = processor.process(container, &ctx);
            let expected = processor.supported_target_kind();
            outcome.diagnostics.extend(output.diagnostics);

            for mutation in output.mutations {
                let kind = mutation.element().kind();
                if kind != expected {
                    tracing::warn!(
                        processor = name,
                        produced = %kind,
                        %expected,
                        target = %mutation.target(),
                        "mutation rejected"
                    );
                    outcome.diagnostics.push(
                        Diagnostic::error(
                            format!(
                                "processor '{name}' generated {kind} '{}' but only generates {expected} elements",
                                mutation.element().name()
                            ),
                            first.span(),
                        )
                        .for_annotation(first.identifier().clone()),
                    );
                    continue;
                }
                outcome.mutations.push(mutation.with_origin(name));
            }
            outcome.processed.push(name.to_string());
        }

        tracing::debug!(
            container = %container.path(),
            processors = outcome.processed.len(),
            mutations = outcome.mutations.len(),
            diagnostics = outcome.diagnostics.len(),
            "dispatch finished"
        );
        outcome
    }

    /// Strongest usage of `field` by generated code
    ///
    /// Consults processors triggered by annotations on the field and on the
    /// enclosing container.
    #[must_use]
    pub fn field_usage(&self, field: &Member, container: &ContainerElement) -> ElementUsage {
        let mut usage = ElementUsage::None;
        let annotations = field
            .modifiers()
            .annotations()
            .iter()
            .chain(container.modifiers().annotations());

        for annotation in annotations {
            for processor in self.processors_for(annotation.identifier()) {
                usage = usage.max(processor.check_field_usage(field, annotation));
                if usage == ElementUsage::ReadWrite {
                    return usage;
                }
            }
        }
        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{ProcessOutput, ProcessorDescriptor};
    use anvil_config::DefaultsOnly;
    use anvil_element::{Annotation, ElementKind, GeneratedElement};
    use pretty_assertions::assert_eq;

    /// Emits one element of `emits` per matched annotation
    #[derive(Debug)]
    struct Emitter {
        name: &'static str,
        descriptor: ProcessorDescriptor,
        emits: ElementKind,
        usage: ElementUsage,
    }

    impl Emitter {
        fn new(name: &'static str, ids: &[&str], emits: ElementKind) -> Self {
            Self {
                name,
                descriptor: ProcessorDescriptor::parse(ElementKind::Method, ids).unwrap(),
                emits,
                usage: ElementUsage::None,
            }
        }

        fn with_usage(mut self, usage: ElementUsage) -> Self {
            self.usage = usage;
            self
        }
    }

    impl Processor for Emitter {
        fn descriptor(&self) -> &ProcessorDescriptor {
            &self.descriptor
        }

        fn name(&self) -> &str {
            self.name
        }

        fn collect_matched_annotations<'c>(
            &self,
            container: &'c ContainerElement,
        ) -> Vec<&'c Annotation> {
            self.supported_annotations().collect_from(container)
        }

        fn process(&self, container: &ContainerElement, _ctx: &ProcessingContext<'_>) -> ProcessOutput {
            let mut output = ProcessOutput::new();
            for (i, _) in self.collect_matched_annotations(container).iter().enumerate() {
                output.push_mutation(GeneratedMutation::add(
                    container.path().clone(),
                    GeneratedElement::new(self.emits, format!("{}{i}", self.name), "void"),
                ));
            }
            output
        }

        fn check_field_usage(&self, _field: &Member, _annotation: &Annotation) -> ElementUsage {
            self.usage
        }
    }

    fn id(s: &str) -> AnnotationIdentifier {
        s.parse().unwrap()
    }

    fn order() -> ContainerElement {
        ContainerElement::new("com.acme.Order".parse().unwrap())
    }

    #[test]
    fn index_covers_equivalents() {
        let mut registry = ProcessorRegistry::new();
        registry.register(Arc::new(Emitter::new(
            "getter",
            &["lombok.Getter", "lombok.experimental.Getter"],
            ElementKind::Method,
        )));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.processors_for(&id("lombok.Getter")).count(), 1);
        assert_eq!(registry.processors_for(&id("lombok.experimental.Getter")).count(), 1);
        assert_eq!(registry.processors_for(&id("lombok.Setter")).count(), 0);
    }

    #[test]
    fn dispatch_runs_in_registration_order() {
        let mut registry = ProcessorRegistry::new();
        registry.register(Arc::new(Emitter::new("b", &["com.acme.B"], ElementKind::Method)));
        registry.register(Arc::new(Emitter::new("a", &["com.acme.A"], ElementKind::Method)));

        let container = order()
            .with_annotation(Annotation::new(id("com.acme.A")))
            .with_annotation(Annotation::new(id("com.acme.B")));
        let outcome = registry.dispatch(&container, &GlobalSettings::default(), &DefaultsOnly);

        assert_eq!(outcome.processed, vec!["b", "a"]);
        let origins: Vec<&str> = outcome.mutations.iter().map(GeneratedMutation::origin).collect();
        assert_eq!(origins, vec!["b", "a"]);
        assert!(!outcome.has_errors());
    }

    #[test]
    fn untriggered_and_disabled_processors_do_not_run() {
        let mut registry = ProcessorRegistry::new();
        registry.register(Arc::new(Emitter::new("a", &["com.acme.A"], ElementKind::Method)));
        registry.register(Arc::new(Emitter::new("b", &["com.acme.B"], ElementKind::Method)));

        let container = order().with_annotation(Annotation::new(id("com.acme.A")));
        let settings = GlobalSettings::default().with_disabled("a");
        let outcome = registry.dispatch(&container, &settings, &DefaultsOnly);

        assert!(outcome.processed.is_empty());
        assert!(outcome.mutations.is_empty());
    }

    #[test]
    fn wrong_kind_mutations_are_rejected() {
        let mut registry = ProcessorRegistry::new();
        registry.register(Arc::new(Emitter::new("rogue", &["com.acme.R"], ElementKind::Field)));

        let container = order().with_annotation(
            Annotation::new(id("com.acme.R")).with_span(anvil_element::SourceSpan::new(3, 14)),
        );
        let outcome = registry.dispatch(&container, &GlobalSettings::default(), &DefaultsOnly);

        assert!(outcome.mutations.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.has_errors());
        assert_eq!(outcome.diagnostics[0].span, anvil_element::SourceSpan::new(3, 14));
    }

    #[test]
    fn field_usage_takes_strongest_answer() {
        let mut registry = ProcessorRegistry::new();
        registry.register(Arc::new(
            Emitter::new("getter", &["lombok.Getter"], ElementKind::Method)
                .with_usage(ElementUsage::Read),
        ));
        registry.register(Arc::new(
            Emitter::new("setter", &["lombok.Setter"], ElementKind::Method)
                .with_usage(ElementUsage::ReadWrite),
        ));

        let field = Member::field("id", "long").with_annotation(Annotation::new(id("lombok.Getter")));
        let container = order().with_member(field.clone());
        assert!(field.is_annotated_with(&id("lombok.Getter")));
        assert_eq!(registry.field_usage(&field, &container), ElementUsage::Read);

        let container = container.with_annotation(Annotation::new(id("lombok.Setter")));
        assert_eq!(registry.field_usage(&field, &container), ElementUsage::ReadWrite);

        let bare = Member::field("note", "String");
        assert_eq!(registry.field_usage(&bare, &order()), ElementUsage::None);
    }
}
