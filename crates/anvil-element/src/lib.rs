//! Anvil Element Model
//!
//! The slice of a host syntax tree that annotation processors read, plus the
//! mutation descriptions they hand back.
//!
//! # Core Concepts
//!
//! - [`ElementPath`]: Dotted path to a package, class or member; doubles as a
//!   configuration scope
//! - [`AnnotationIdentifier`]: Fully-qualified annotation type name
//! - [`Annotation`]: Annotation instance with its *declared* arguments only
//! - [`ContainerElement`] / [`Member`]: Class-like scopes and their members
//! - [`GeneratedMutation`]: By-value description of a tree change
//!
//! # Example
//!
//! ```rust
//! use anvil_element::{Annotation, ArgValue, ContainerElement, Member};
//!
//! let getter = Annotation::new("lombok.Getter".parse().unwrap())
//!     .with_argument("lazy", ArgValue::Bool(true));
//! let order = ContainerElement::new("com.acme.Order".parse().unwrap())
//!     .with_member(Member::field("id", "long").with_annotation(getter));
//!
//! assert_eq!(order.fields().count(), 1);
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod annotation;
mod element;
mod mutation;
mod path;

pub use annotation::{
    Annotation, AnnotationArgument, AnnotationIdentifier, ArgValue, SourceSpan, SpannedText,
};
pub use element::{Annotated, ContainerElement, ElementKind, Member, ModifierList};
pub use mutation::{GeneratedElement, GeneratedMutation, MutationOp};
pub use path::{ElementPath, PathError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
