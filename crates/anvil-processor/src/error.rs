//! Error types for processor construction
//!
//! Construction errors are programming errors: a processor that declares no
//! trigger annotation can never be dispatched to. They are returned from the
//! constructor so the mistake surfaces before the processor is registered.

use anvil_element::PathError;

/// Errors building processor metadata
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessorError {
    /// Match set built from zero identifiers
    #[error("processor must support at least one annotation")]
    NoSupportedAnnotations,

    /// Match set built from more distinct identifiers than allowed
    #[error("processor supports at most {max} annotations, got {count}")]
    TooManyAnnotations {
        /// Distinct identifiers supplied
        count: usize,
        /// Upper bound
        max: usize,
    },

    /// Identifier text is not a qualified name
    #[error("invalid annotation identifier '{text}': {source}")]
    InvalidIdentifier {
        /// Identifier as written
        text: String,
        /// Path parse failure
        #[source]
        source: PathError,
    },
}

/// Result alias for processor construction
pub type ProcessorResult<T> = Result<T, ProcessorError>;
