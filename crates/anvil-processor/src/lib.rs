//! Anvil Processor Framework
//!
//! Contract for pluggable annotation processors plus the shared services they
//! lean on.
//!
//! # Core Concepts
//!
//! - [`Processor`]: Reacts to up to three annotation types and generates
//!   elements of one kind
//! - [`AnnotationMatchSet`]: Primary trigger plus equivalents
//! - [`ConfigResolver`]: Explicit argument → scoped configuration → default
//! - [`ToleratedElementFilter`]: Hides hand-maintained members from
//!   "already exists" checks
//! - [`AnnotationInjector`]: Copies user-requested annotations onto
//!   generated elements
//! - [`ProcessorRegistry`]: Indexes processors and dispatches containers
//!
//! # Example
//!
//! ```rust
//! use anvil_element::{Annotation, ContainerElement, ElementKind};
//! use anvil_processor::{Processor, ProcessorDescriptor};
//!
//! #[derive(Debug)]
//! struct Marker(ProcessorDescriptor);
//!
//! impl Processor for Marker {
//!     fn descriptor(&self) -> &ProcessorDescriptor {
//!         &self.0
//!     }
//!
//!     fn name(&self) -> &str {
//!         "marker"
//!     }
//!
//!     fn collect_matched_annotations<'c>(&self, container: &'c ContainerElement) -> Vec<&'c Annotation> {
//!         self.supported_annotations().collect_from(container)
//!     }
//! }
//!
//! let marker = Marker(ProcessorDescriptor::parse(ElementKind::Method, &["com.acme.Mark"]).unwrap());
//! let order = ContainerElement::new("com.acme.Order".parse().unwrap())
//!     .with_annotation(Annotation::new("com.acme.Mark".parse().unwrap()));
//!
//! assert_eq!(marker.collect_matched_annotations(&order).len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod diagnostic;
pub mod error;
pub mod inject;
pub mod matching;
pub mod parser;
pub mod processor;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod tolerate;

pub use diagnostic::{Diagnostic, Severity};
pub use error::{ProcessorError, ProcessorResult};
pub use inject::{AnnotationInjector, InjectionReport};
pub use matching::{AnnotationMatchSet, MatchRole};
pub use parser::{AnnotationParseError, AnnotationParser, TextAnnotationParser};
pub use processor::{ElementUsage, ProcessOutput, ProcessingContext, Processor, ProcessorDescriptor};
pub use registry::{DispatchOutcome, ProcessorRegistry};
pub use resolver::{ConfigResolver, Resolved, ResolutionSource};
pub use settings::GlobalSettings;
pub use tolerate::ToleratedElementFilter;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
