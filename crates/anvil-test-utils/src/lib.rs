//! Testing utilities for Anvil workspace
//!
//! Shared test helpers, fixtures, and two small accessor processors that
//! exercise the whole processor contract.

#![allow(missing_docs)]

use anvil_config::{ConfigKey, LayeredConfig, ScopedConfig, ScopedValue};
use anvil_element::{
    Annotated, Annotation, AnnotationIdentifier, ArgValue, ContainerElement, ElementKind,
    ElementPath, GeneratedElement, GeneratedMutation, Member, ModifierList, SourceSpan,
    SpannedText,
};
use anvil_processor::{
    AnnotationParser, Diagnostic, ElementUsage, GlobalSettings, ProcessOutput, ProcessingContext,
    Processor, ProcessorDescriptor, TextAnnotationParser, ToleratedElementFilter,
};
use parking_lot::Mutex;
use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static TRACING: Once = Once::new();

/// Install a test-friendly subscriber once per process
///
/// Honors `RUST_LOG`; defaults to debug for the anvil crates.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| {
                        tracing_subscriber::EnvFilter::new("anvil_processor=debug,anvil_config=debug")
                    }),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer().without_time())
            .try_init();
    });
}

// Fixtures

pub fn id(name: &str) -> AnnotationIdentifier {
    name.parse().unwrap()
}

pub fn path(text: &str) -> ElementPath {
    text.parse().unwrap()
}

pub fn annotation(name: &str) -> Annotation {
    Annotation::new(id(name))
}

/// Text argument positioned at `start`
pub fn text_arg(text: &str, start: usize) -> ArgValue {
    ArgValue::Text(SpannedText::new(text, SourceSpan::at(start, text.len())))
}

/// `com.acme.Order` with `long id`, `String name` and `boolean active`
pub fn order() -> ContainerElement {
    ContainerElement::new(path("com.acme.Order"))
        .with_member(Member::field("id", "long"))
        .with_member(Member::field("name", "String"))
        .with_member(Member::field("active", "boolean"))
}

pub fn tolerated_method(name: &str, return_type: &str) -> Member {
    Member::method(name, return_type)
        .with_annotation(Annotation::new(ToleratedElementFilter::default_marker()))
}

/// Owns every collaborator a [`ProcessingContext`] borrows
#[derive(Debug, Default)]
pub struct TestHost {
    pub config: LayeredConfig,
    pub parser: TextAnnotationParser,
    pub tolerated: ToleratedElementFilter,
    pub settings: GlobalSettings,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LayeredConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_settings(mut self, settings: GlobalSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn ctx(&self) -> ProcessingContext<'_> {
        ProcessingContext::new(&self.config, &self.parser, &self.tolerated, &self.settings)
    }
}

/// Scoped configuration that counts its scope walks
#[derive(Debug, Default)]
pub struct CountingConfig {
    inner: LayeredConfig,
    walks: Mutex<usize>,
}

impl CountingConfig {
    pub fn new(inner: LayeredConfig) -> Self {
        Self {
            inner,
            walks: Mutex::new(0),
        }
    }

    pub fn walks(&self) -> usize {
        *self.walks.lock()
    }
}

impl ScopedConfig for CountingConfig {
    fn find(&self, key: &ConfigKey, scope: &ElementPath) -> Option<ScopedValue> {
        *self.walks.lock() += 1;
        self.inner.find(key, scope)
    }
}

/// Parser that rejects everything; checks injection isolation
#[derive(Debug, Default)]
pub struct RejectingParser;

impl AnnotationParser for RejectingParser {
    fn parse(
        &self,
        text: &str,
        span: SourceSpan,
    ) -> Result<Annotation, anvil_processor::AnnotationParseError> {
        Err(anvil_processor::AnnotationParseError::InvalidName {
            name: text.to_string(),
            span,
        })
    }
}

// Sample processors

pub const FLUENT: ConfigKey = ConfigKey::new("lombok.accessors.fluent", false);
pub const CHAIN: ConfigKey = ConfigKey::new("lombok.accessors.chain", false);

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Field-level trigger if present, else the class-level one
fn trigger_for<'c>(
    processor: &dyn Processor,
    container: &'c ContainerElement,
    field: &'c Member,
) -> Option<&'c Annotation> {
    let annotations = processor.supported_annotations();
    annotations
        .select_trigger(&annotations.collect_on(field))
        .or_else(|| annotations.select_trigger(&annotations.collect_on(container)))
}

fn already_defined(existing: &[&Member], name: &str, arity: usize) -> bool {
    existing
        .iter()
        .any(|m| m.name() == name && m.parameters().len() == arity)
}

/// `@lombok.Getter` / `@lombok.experimental.Getter`
#[derive(Debug)]
pub struct GetterProcessor {
    descriptor: ProcessorDescriptor,
}

impl Default for GetterProcessor {
    fn default() -> Self {
        Self {
            descriptor: ProcessorDescriptor::parse(
                ElementKind::Method,
                &["lombok.Getter", "lombok.experimental.Getter"],
            )
            .unwrap(),
        }
    }
}

impl GetterProcessor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Processor for GetterProcessor {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    fn name(&self) -> &str {
        "getter"
    }

    fn is_enabled(&self, settings: &GlobalSettings) -> bool {
        settings.feature("getter") != Some(false)
    }

    fn collect_matched_annotations<'c>(&self, container: &'c ContainerElement) -> Vec<&'c Annotation> {
        self.supported_annotations().collect_from(container)
    }

    fn process(&self, container: &ContainerElement, ctx: &ProcessingContext<'_>) -> ProcessOutput {
        let mut output = ProcessOutput::new();
        let existing = ctx.existing_members(container, ElementKind::Method);

        for field in container.fields().filter(|f| !f.is_static()) {
            let Some(trigger) = trigger_for(self, container, field) else {
                continue;
            };
            let fluent = ctx.resolve_boolean(trigger, container.path(), "fluent", &FLUENT);
            let name = if fluent {
                field.name().to_string()
            } else if field.type_name() == "boolean" {
                format!("is{}", capitalize(field.name()))
            } else {
                format!("get{}", capitalize(field.name()))
            };

            if already_defined(&existing, &name, 0) {
                output.push_diagnostic(
                    Diagnostic::warning(format!("method {name}() already exists"), trigger.span())
                        .for_annotation(trigger.identifier().clone()),
                );
                continue;
            }

            let mut element = GeneratedElement::new(ElementKind::Method, name, field.type_name())
                .with_modifiers(ModifierList::new().with_keyword("public"))
                .with_body(format!("return this.{};", field.name()));
            let report = ctx.injector().inject_configured_annotations(
                Some(trigger),
                element.modifiers_mut(),
                "onMethod",
            );
            output.extend_diagnostics(report.diagnostics);
            output.push_mutation(GeneratedMutation::add(container.path().clone(), element));
        }
        output
    }

    fn check_field_usage(&self, _field: &Member, _annotation: &Annotation) -> ElementUsage {
        ElementUsage::Read
    }
}

/// `@lombok.Setter`
#[derive(Debug)]
pub struct SetterProcessor {
    descriptor: ProcessorDescriptor,
}

impl Default for SetterProcessor {
    fn default() -> Self {
        Self {
            descriptor: ProcessorDescriptor::parse(ElementKind::Method, &["lombok.Setter"]).unwrap(),
        }
    }
}

impl SetterProcessor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Processor for SetterProcessor {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    fn name(&self) -> &str {
        "setter"
    }

    fn collect_matched_annotations<'c>(&self, container: &'c ContainerElement) -> Vec<&'c Annotation> {
        self.supported_annotations().collect_from(container)
    }

    fn process(&self, container: &ContainerElement, ctx: &ProcessingContext<'_>) -> ProcessOutput {
        let mut output = ProcessOutput::new();
        let existing = ctx.existing_members(container, ElementKind::Method);

        for field in container
            .fields()
            .filter(|f| !f.is_static() && !f.modifiers().has_keyword("final"))
        {
            let Some(trigger) = trigger_for(self, container, field) else {
                continue;
            };
            let name = format!("set{}", capitalize(field.name()));
            if already_defined(&existing, &name, 1) {
                output.push_diagnostic(
                    Diagnostic::warning(format!("method {name}(1) already exists"), trigger.span())
                        .for_annotation(trigger.identifier().clone()),
                );
                continue;
            }

            let chain = ctx.resolve_boolean(trigger, container.path(), "chain", &CHAIN);
            let (return_type, body) = if chain {
                (container.name().to_string(), format!("this.{0} = {0}; return this;", field.name()))
            } else {
                ("void".to_string(), format!("this.{0} = {0};", field.name()))
            };

            let mut element = GeneratedElement::new(ElementKind::Method, name, return_type)
                .with_modifiers(ModifierList::new().with_keyword("public"))
                .with_parameter(field.name(), field.type_name())
                .with_body(body);
            let report = ctx.injector().inject_configured_annotations(
                Some(trigger),
                element.modifiers_mut(),
                "onMethod",
            );
            output.extend_diagnostics(report.diagnostics);
            output.push_mutation(GeneratedMutation::add(container.path().clone(), element));
        }
        output
    }

    fn check_field_usage(&self, _field: &Member, _annotation: &Annotation) -> ElementUsage {
        ElementUsage::ReadWrite
    }
}
