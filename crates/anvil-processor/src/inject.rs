//! Copying user-requested annotations onto generated elements
//!
//! Users write annotations they want on generated code as a parameter of the
//! trigger, e.g. `@Getter(onMethod = {"@Nonnull", "@Deprecated"})`. Every
//! entry is handled on its own: a malformed entry produces one diagnostic and
//! the remaining entries still apply.

use crate::diagnostic::Diagnostic;
use crate::parser::AnnotationParser;
use anvil_element::{Annotation, ArgValue, ModifierList};

/// Simple name of the wrapper form `@__({...})`
const WRAPPER: &str = "__";

/// Outcome of one injection call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionReport {
    /// Annotations appended to the target
    pub injected: usize,
    /// One entry per malformed request
    pub diagnostics: Vec<Diagnostic>,
}

impl InjectionReport {
    /// Check that no entry failed
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Appends annotations requested through a trigger parameter
#[derive(Clone, Copy)]
pub struct AnnotationInjector<'a> {
    parser: &'a dyn AnnotationParser,
}

impl std::fmt::Debug for AnnotationInjector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationInjector").finish_non_exhaustive()
    }
}

impl<'a> AnnotationInjector<'a> {
    /// Create injector using `parser` for text entries
    #[inline]
    #[must_use]
    pub fn new(parser: &'a dyn AnnotationParser) -> Self {
        Self { parser }
    }

    /// Append every annotation listed under `parameter` of `trigger` to
    /// `target`, in request order
    ///
    /// Accepts the `parameter_` spelling when `parameter` is absent. Existing
    /// annotations on `target` are left alone and nothing is de-duplicated.
    pub fn inject_configured_annotations(
        &self,
        trigger: Option<&Annotation>,
        target: &mut ModifierList,
        parameter: &str,
    ) -> InjectionReport {
        let mut report = InjectionReport::default();
        let Some(trigger) = trigger else {
            return report;
        };
        let Some(requested) = requested_value(trigger, parameter) else {
            return report;
        };

        for entry in entries(requested) {
            match entry {
                ArgValue::Text(text) => match self.parser.parse(&text.text, text.span) {
                    Ok(annotation) => {
                        target.add_annotation(annotation);
                        report.injected += 1;
                    }
                    Err(err) => {
                        tracing::warn!(
                            trigger = %trigger.identifier(),
                            parameter,
                            entry = %text.text,
                            error = %err,
                            "skipping malformed annotation entry"
                        );
                        report.diagnostics.push(
                            Diagnostic::error(
                                format!("cannot parse annotation '{}': {err}", text.text),
                                err.span(),
                            )
                            .for_annotation(trigger.identifier().clone()),
                        );
                    }
                },
                ArgValue::Nested(annotation) => {
                    target.add_annotation((**annotation).clone());
                    report.injected += 1;
                }
                other => {
                    tracing::warn!(
                        trigger = %trigger.identifier(),
                        parameter,
                        found = other.kind_name(),
                        "skipping non-annotation entry"
                    );
                    report.diagnostics.push(
                        Diagnostic::error(
                            format!(
                                "expected an annotation in '{parameter}', found {}",
                                other.kind_name()
                            ),
                            trigger.span(),
                        )
                        .for_annotation(trigger.identifier().clone()),
                    );
                }
            }
        }

        tracing::debug!(
            trigger = %trigger.identifier(),
            parameter,
            injected = report.injected,
            failed = report.diagnostics.len(),
            "annotations injected"
        );
        report
    }
}

fn requested_value<'t>(trigger: &'t Annotation, parameter: &str) -> Option<&'t ArgValue> {
    trigger
        .declared(parameter)
        .or_else(|| trigger.declared(&format!("{parameter}_")))
}

/// Top-level entries, with lists flattened and `@__(...)` unwrapped
fn entries(value: &ArgValue) -> Vec<&ArgValue> {
    match value {
        ArgValue::List(items) => items.iter().collect(),
        ArgValue::Nested(wrapper) if wrapper.identifier().simple_name() == WRAPPER => {
            match wrapper.declared("value") {
                Some(ArgValue::List(items)) => items.iter().collect(),
                Some(single) => vec![single],
                None => Vec::new(),
            }
        }
        single => vec![single],
    }
}
