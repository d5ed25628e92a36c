//! Annotation text parsing
//!
//! Converts a textual annotation such as
//! `@javax.annotation.Nonnull` or `@com.acme.Audit(level = 2, tags = {"a", "b"})`
//! into an [`Annotation`]. Each call stands alone and can fail on its own.
//!
//! [`TextAnnotationParser`] hands the text to the `tree-sitter-java` grammar as
//! the modifier of a throwaway class declaration and walks the resulting
//! annotation node:
//!
//! | node                              | value                         |
//! |-----------------------------------|-------------------------------|
//! | `true` / `false`                  | [`ArgValue::Bool`]            |
//! | decimal integer, optionally `-`   | [`ArgValue::Int`]             |
//! | string literal                    | [`ArgValue::Text`] (unquoted) |
//! | `{ ... }`                         | [`ArgValue::List`]            |
//! | `@Name(...)`                      | [`ArgValue::Nested`]          |
//! | anything else                     | [`ArgValue::Text`] (raw)      |
//!
//! A leading `@` may be left out. Nesting deeper than
//! [`TextAnnotationParser::MAX_NESTING`] is rejected before the grammar runs.

use anvil_element::{Annotation, AnnotationIdentifier, ArgValue, SourceSpan, SpannedText};
use tree_sitter::{Node, Parser};

/// Parses annotation text
pub trait AnnotationParser: Send + Sync {
    /// Parse `text`, whose first byte sits at `span.start` in the source
    ///
    /// # Errors
    /// Returns a parse error pointing at the offending part of `text`
    fn parse(&self, text: &str, span: SourceSpan) -> Result<Annotation, AnnotationParseError>;
}

/// Failure to parse one annotation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationParseError {
    /// Nothing but whitespace
    #[error("empty annotation text")]
    Empty {
        /// Position of the text
        span: SourceSpan,
    },

    /// Name is not a qualified identifier
    #[error("invalid annotation name '{name}'")]
    InvalidName {
        /// Name as written
        name: String,
        /// Position of the name
        span: SourceSpan,
    },

    /// Text the grammar could not place
    #[error("unexpected '{found}'")]
    Syntax {
        /// Offending text
        found: String,
        /// Position of the text
        span: SourceSpan,
    },

    /// Token the grammar needed but did not find
    #[error("missing '{expected}'")]
    Missing {
        /// Token kind
        expected: String,
        /// Where it was expected
        span: SourceSpan,
    },

    /// Input ended early
    #[error("unexpected end of annotation")]
    UnexpectedEnd {
        /// End position
        span: SourceSpan,
    },

    /// Valid Java, but not exactly one annotation
    #[error("expected a single annotation")]
    NotAnAnnotation {
        /// Position of the text
        span: SourceSpan,
    },

    /// Lists or nested annotations go too deep
    #[error("annotation nested deeper than {limit} levels")]
    TooDeep {
        /// Nesting bound
        limit: usize,
        /// Position of the first opening past the bound
        span: SourceSpan,
    },

    /// Grammar could not be loaded or run
    #[error("annotation grammar unavailable: {reason}")]
    Unavailable {
        /// Underlying failure
        reason: String,
        /// Position of the text
        span: SourceSpan,
    },
}

impl AnnotationParseError {
    /// Position the error refers to
    #[must_use]
    pub fn span(&self) -> SourceSpan {
        match self {
            Self::Empty { span }
            | Self::InvalidName { span, .. }
            | Self::Syntax { span, .. }
            | Self::Missing { span, .. }
            | Self::UnexpectedEnd { span }
            | Self::NotAnAnnotation { span }
            | Self::TooDeep { span, .. }
            | Self::Unavailable { span, .. } => *span,
        }
    }
}

/// Parser for Java annotation text backed by `tree-sitter-java`
#[derive(Debug, Clone, Copy, Default)]
pub struct TextAnnotationParser;

impl TextAnnotationParser {
    /// Deepest accepted nesting of parentheses, braces and brackets
    pub const MAX_NESTING: usize = 64;

    /// Create parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AnnotationParser for TextAnnotationParser {
    fn parse(&self, text: &str, span: SourceSpan) -> Result<Annotation, AnnotationParseError> {
        if text.trim().is_empty() {
            return Err(AnnotationParseError::Empty { span });
        }
        check_nesting(text, span.start)?;

        let wrapped = Wrapped::new(text, span.start);
        let unavailable = |reason: String| AnnotationParseError::Unavailable { reason, span };

        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|e| unavailable(e.to_string()))?;
        let tree = parser
            .parse(&wrapped.source, None)
            .ok_or_else(|| unavailable("parse cancelled".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(match first_error(root) {
                Some(node) => wrapped.syntax_error(node),
                None => AnnotationParseError::Syntax {
                    found: text.trim().to_string(),
                    span,
                },
            });
        }

        let node = wrapped
            .sole_annotation(root)
            .ok_or(AnnotationParseError::NotAnAnnotation { span })?;
        wrapped.annotation(node, 0)
    }
}

/// Reject runaway nesting before the grammar sees it
fn check_nesting(text: &str, base: usize) -> Result<(), AnnotationParseError> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (at, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '{' | '[' => {
                depth += 1;
                if depth > TextAnnotationParser::MAX_NESTING {
                    return Err(AnnotationParseError::TooDeep {
                        limit: TextAnnotationParser::MAX_NESTING,
                        span: SourceSpan::at(base + at, 1),
                    });
                }
            }
            ')' | '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// First `ERROR` or `MISSING` node in document order
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Annotation text placed in front of a class declaration
struct Wrapped {
    source: String,
    /// Bytes inserted before the text
    prefix: usize,
    len: usize,
    base: usize,
}

impl Wrapped {
    const DECLARATION: &'static str = "\nclass __A {}";

    fn new(text: &str, base: usize) -> Self {
        let at = if text.trim_start().starts_with('@') { "" } else { "@" };
        Self {
            source: format!("{at}{text}{}", Self::DECLARATION),
            prefix: at.len(),
            len: text.len(),
            base,
        }
    }

    /// Source position of a byte in the wrapped text, clamped to the entry
    fn position(&self, byte: usize) -> usize {
        self.base + byte.saturating_sub(self.prefix).min(self.len)
    }

    fn span_of(&self, node: Node<'_>) -> SourceSpan {
        SourceSpan::new(self.position(node.start_byte()), self.position(node.end_byte()))
    }

    fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }

    /// Part of the node that lies inside the entry
    fn entry_text(&self, node: Node<'_>) -> &str {
        let end = self.prefix + self.len;
        let from = node.start_byte().clamp(self.prefix, end);
        let to = node.end_byte().clamp(from, end);
        self.source.get(from..to).unwrap_or_default()
    }

    fn syntax_error(&self, node: Node<'_>) -> AnnotationParseError {
        let span = self.span_of(node);
        if node.is_missing() {
            return AnnotationParseError::Missing {
                expected: node.kind().to_string(),
                span,
            };
        }
        let found = self.entry_text(node).trim();
        if found.is_empty() {
            AnnotationParseError::UnexpectedEnd { span }
        } else {
            AnnotationParseError::Syntax {
                found: found.chars().take(24).collect(),
                span,
            }
        }
    }

    /// The only modifier of the single class declaration, if it is an annotation
    fn sole_annotation<'t>(&self, root: Node<'t>) -> Option<Node<'t>> {
        let mut cursor = root.walk();
        let mut declarations = root.named_children(&mut cursor).filter(|n| !n.is_extra());
        let class = declarations.next().filter(|n| n.kind() == "class_declaration")?;
        if declarations.next().is_some() {
            return None;
        }

        let mut cursor = class.walk();
        let modifiers = class
            .named_children(&mut cursor)
            .find(|n| n.kind() == "modifiers")?;
        let mut cursor = modifiers.walk();
        let mut parts = modifiers.children(&mut cursor).filter(|n| !n.is_extra());
        let annotation = parts
            .next()
            .filter(|n| matches!(n.kind(), "marker_annotation" | "annotation"))?;
        parts.next().is_none().then_some(annotation)
    }

    fn too_deep(&self, node: Node<'_>) -> AnnotationParseError {
        AnnotationParseError::TooDeep {
            limit: TextAnnotationParser::MAX_NESTING,
            span: self.span_of(node),
        }
    }

    fn annotation(&self, node: Node<'_>, depth: usize) -> Result<Annotation, AnnotationParseError> {
        if depth > TextAnnotationParser::MAX_NESTING {
            return Err(self.too_deep(node));
        }
        let name_node = node
            .child_by_field_name("name")
            .ok_or(AnnotationParseError::NotAnAnnotation {
                span: self.span_of(node),
            })?;
        let name: String = self
            .text(name_node)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let identifier: AnnotationIdentifier =
            name.parse()
                .map_err(|_| AnnotationParseError::InvalidName {
                    name: name.clone(),
                    span: self.span_of(name_node),
                })?;

        let mut annotation = Annotation::new(identifier);
        if let Some(arguments) = node.child_by_field_name("arguments") {
            let mut cursor = arguments.walk();
            let items: Vec<Node<'_>> = arguments
                .named_children(&mut cursor)
                .filter(|n| !n.is_extra())
                .collect();
            for item in items {
                if item.kind() == "element_value_pair" {
                    let (Some(key), Some(value)) = (
                        item.child_by_field_name("key"),
                        item.child_by_field_name("value"),
                    ) else {
                        return Err(AnnotationParseError::Syntax {
                            found: self.text(item).to_string(),
                            span: self.span_of(item),
                        });
                    };
                    annotation = annotation.with_argument(self.text(key), self.value(value, depth + 1)?);
                } else {
                    annotation = annotation.with_argument("value", self.value(item, depth + 1)?);
                }
            }
        }
        Ok(annotation.with_span(self.span_of(node)))
    }

    fn value(&self, node: Node<'_>, depth: usize) -> Result<ArgValue, AnnotationParseError> {
        if depth > TextAnnotationParser::MAX_NESTING {
            return Err(self.too_deep(node));
        }
        Ok(match node.kind() {
            "true" => ArgValue::Bool(true),
            "false" => ArgValue::Bool(false),
            "marker_annotation" | "annotation" => ArgValue::Nested(Box::new(self.annotation(node, depth)?)),
            "element_value_array_initializer" => {
                let mut cursor = node.walk();
                let items: Vec<Node<'_>> = node
                    .named_children(&mut cursor)
                    .filter(|n| !n.is_extra())
                    .collect();
                ArgValue::List(
                    items
                        .into_iter()
                        .map(|item| self.value(item, depth + 1))
                        .collect::<Result<_, _>>()?,
                )
            }
            "string_literal" => self.string(node),
            "decimal_integer_literal" | "unary_expression" => self.integer(node),
            _ => self.raw(node),
        })
    }

    fn raw(&self, node: Node<'_>) -> ArgValue {
        ArgValue::Text(SpannedText::new(self.text(node), self.span_of(node)))
    }

    fn integer(&self, node: Node<'_>) -> ArgValue {
        let digits: String = self
            .text(node)
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect();
        let digits = digits.trim_end_matches(['l', 'L']);
        digits
            .parse::<i64>()
            .map_or_else(|_| self.raw(node), ArgValue::Int)
    }

    /// Unquoted content; the span covers the content only
    fn string(&self, node: Node<'_>) -> ArgValue {
        let literal = self.text(node);
        let Some(inner) = literal
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .filter(|s| !s.starts_with("\"\""))
        else {
            return self.raw(node);
        };

        let mut content = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                content.push(c);
                continue;
            }
            match chars.next() {
                Some('n') => content.push('\n'),
                Some('t') => content.push('\t'),
                Some('r') => content.push('\r'),
                Some('b') => content.push('\u{8}'),
                Some('f') => content.push('\u{c}'),
                Some('s') => content.push(' '),
                Some(other) => content.push(other),
                None => {}
            }
        }
        let span = SourceSpan::new(
            self.position(node.start_byte() + 1),
            self.position(node.end_byte() - 1),
        );
        ArgValue::Text(SpannedText::new(content, span))
    }
}
