//! Annotations attached to program elements
//!
//! An [`Annotation`] only records the arguments that were written at the use
//! site. Defaults declared on the annotation type are never materialised, so
//! "absent" and "explicitly set to the default" stay distinguishable.

use crate::path::{ElementPath, PathError};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Fully-qualified annotation type name
///
/// Equality is exact name equality: `lombok.Getter` and `Getter` are different
/// identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationIdentifier(ElementPath);

impl AnnotationIdentifier {
    /// Create identifier from a non-empty path
    ///
    /// # Errors
    /// Returns [`PathError::Empty`] for the root path
    pub fn new(path: ElementPath) -> Result<Self, PathError> {
        if path.is_root() {
            return Err(PathError::Empty);
        }
        Ok(Self(path))
    }

    /// Identifier from literal segments, for compiled-in names
    ///
    /// Non-empty by construction; segment characters are not validated.
    #[must_use]
    pub fn from_segments(first: &str, rest: &[&str]) -> Self {
        let mut segments = Vec::with_capacity(rest.len() + 1);
        segments.push(first.to_string());
        segments.extend(rest.iter().map(|s| (*s).to_string()));
        Self(ElementPath::new(segments))
    }

    /// Underlying path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &ElementPath {
        &self.0
    }

    /// Unqualified type name (`Getter` for `lombok.Getter`)
    #[inline]
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.0.last().unwrap_or_default()
    }
}

impl Display for AnnotationIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for AnnotationIdentifier {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.parse()?)
    }
}

/// Byte range in the source the element was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceSpan {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

impl SourceSpan {
    /// Create span
    #[inline]
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span of `len` bytes starting at `start`
    #[inline]
    #[must_use]
    pub fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Sub-span relative to this span's start
    #[inline]
    #[must_use]
    pub fn slice(&self, offset: usize, len: usize) -> Self {
        Self::at(self.start + offset, len)
    }
}

impl Display for SourceSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Text with the span it was written at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpannedText {
    /// Raw text
    pub text: String,
    /// Source position
    pub span: SourceSpan,
}

impl SpannedText {
    /// Create spanned text
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

/// Value of a declared annotation argument
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgValue {
    /// `true` / `false` literal
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// String literal or unevaluated expression text
    Text(SpannedText),
    /// Array initializer `{a, b, c}`
    List(Vec<ArgValue>),
    /// Nested annotation `@Foo(...)`
    Nested(Box<Annotation>),
}

impl ArgValue {
    /// Boolean literal value, if this is one
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Text value, if this is one
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&SpannedText> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Short kind label for diagnostics
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Nested(_) => "annotation",
        }
    }
}

/// Argument written at the annotation use site
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationArgument {
    /// Parameter name (`value` for the single-value shorthand)
    pub name: String,
    /// Declared value
    pub value: ArgValue,
}

impl AnnotationArgument {
    /// Create argument
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: ArgValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Annotation instance on a program element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    identifier: AnnotationIdentifier,
    arguments: Vec<AnnotationArgument>,
    span: SourceSpan,
}

impl Annotation {
    /// Create annotation without arguments
    #[inline]
    #[must_use]
    pub fn new(identifier: AnnotationIdentifier) -> Self {
        Self {
            identifier,
            arguments: Vec::new(),
            span: SourceSpan::default(),
        }
    }

    /// Set source span
    #[inline]
    #[must_use]
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = span;
        self
    }

    /// Add a declared argument
    #[inline]
    #[must_use]
    pub fn with_argument(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.arguments.push(AnnotationArgument::new(name, value));
        self
    }

    /// Annotation type
    #[inline]
    #[must_use]
    pub fn identifier(&self) -> &AnnotationIdentifier {
        &self.identifier
    }

    /// Declared arguments in source order
    #[inline]
    #[must_use]
    pub fn arguments(&self) -> &[AnnotationArgument] {
        &self.arguments
    }

    /// Source span
    #[inline]
    #[must_use]
    pub fn span(&self) -> SourceSpan {
        self.span
    }

    /// Check annotation type
    #[inline]
    #[must_use]
    pub fn is(&self, identifier: &AnnotationIdentifier) -> bool {
        &self.identifier == identifier
    }

    /// Explicitly declared argument by name
    ///
    /// Returns `None` when the argument was left at its default.
    #[must_use]
    pub fn declared(&self, name: &str) -> Option<&ArgValue> {
        self.arguments
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }

    /// Explicitly declared boolean argument
    ///
    /// `None` when the argument is absent or not a boolean literal.
    #[inline]
    #[must_use]
    pub fn declared_bool(&self, name: &str) -> Option<bool> {
        self.declared(name).and_then(ArgValue::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> AnnotationIdentifier {
        s.parse().unwrap()
    }

    #[test]
    fn identifier_equality_is_exact() {
        assert_eq!(id("lombok.Getter"), id("lombok.Getter"));
        assert_ne!(id("lombok.Getter"), id("Getter"));
        assert_eq!(id("lombok.Getter").simple_name(), "Getter");
    }

    #[test]
    fn identifier_from_segments_matches_parsed() {
        let built = AnnotationIdentifier::from_segments("lombok", &["experimental", "Tolerate"]);
        assert_eq!(built, id("lombok.experimental.Tolerate"));
    }

    #[test]
    fn identifier_rejects_empty() {
        assert!(matches!("".parse::<AnnotationIdentifier>(), Err(PathError::Empty)));
    }

    #[test]
    fn declared_bool_distinguishes_absent_from_false() {
        let annotation = Annotation::new(id("lombok.Getter"))
            .with_argument("fluent", ArgValue::Bool(false));
        assert_eq!(annotation.declared_bool("fluent"), Some(false));
        assert_eq!(annotation.declared_bool("chain"), None);
    }

    #[test]
    fn declared_bool_ignores_non_literals() {
        let annotation = Annotation::new(id("lombok.Getter")).with_argument(
            "fluent",
            ArgValue::Text(SpannedText::new("FLAG", SourceSpan::default())),
        );
        assert!(annotation.declared("fluent").is_some());
        assert_eq!(annotation.declared_bool("fluent"), None);
    }

    #[test]
    fn span_slice_is_relative() {
        let span = SourceSpan::new(10, 30);
        assert_eq!(span.slice(2, 5), SourceSpan::new(12, 17));
    }
}
