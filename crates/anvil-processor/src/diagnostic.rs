//! Diagnostics reported by processors
//!
//! Diagnostics are collected, never thrown: a bad entry in one place does not
//! stop sibling work.

use anvil_element::{AnnotationIdentifier, SourceSpan};
use std::fmt::{self, Display, Formatter};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational
    Info,
    /// Suspicious but generation proceeds
    Warning,
    /// Something requested could not be produced
    Error,
}

/// Message attributable to a source position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Position the message refers to
    pub span: SourceSpan,
    /// Annotation the message concerns, if any
    pub annotation: Option<AnnotationIdentifier>,
}

impl Diagnostic {
    /// Create diagnostic
    #[inline]
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            severity,
            message: message.into(),
            span,
            annotation: None,
        }
    }

    /// Create error diagnostic
    #[inline]
    #[must_use]
    pub fn error(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(Severity::Error, message, span)
    }

    /// Create warning diagnostic
    #[inline]
    #[must_use]
    pub fn warning(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(Severity::Warning, message, span)
    }

    /// Attach the annotation the diagnostic concerns
    #[inline]
    #[must_use]
    pub fn for_annotation(mut self, identifier: AnnotationIdentifier) -> Self {
        self.annotation = Some(identifier);
        self
    }

    /// Check for error severity
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}: {}", self.severity, self.span, self.message)?;
        if let Some(annotation) = &self.annotation {
            write!(f, " (@{annotation})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_span_and_annotation() {
        let diag = Diagnostic::error("bad entry", SourceSpan::new(4, 9))
            .for_annotation("lombok.Getter".parse().unwrap());
        assert_eq!(diag.to_string(), "Error at 4..9: bad entry (@lombok.Getter)");
        assert!(diag.is_error());
    }

    #[test]
    fn severity_orders_by_weight() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }
}
