//! Boolean flag resolution
//!
//! Precedence, highest first:
//! 1. the argument explicitly written on the triggering annotation;
//! 2. the nearest enclosing scope that configures the key;
//! 3. the key's compiled-in default.
//!
//! Tiers 2 and 3 are owned by the [`ScopedConfig`] collaborator. Nothing is
//! cached here.

use anvil_config::{ConfigKey, ScopedConfig};
use anvil_element::{Annotation, ArgValue, ElementPath};

/// Tier that produced a resolved value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionSource {
    /// Explicit annotation argument
    Explicit,
    /// Configured at the given scope
    Configured(ElementPath),
    /// Compiled-in default of the key
    Default,
}

/// Resolved flag with its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Resolved value
    pub value: bool,
    /// Tier that won
    pub source: ResolutionSource,
}

/// Resolves boolean behaviour flags
#[derive(Clone, Copy)]
pub struct ConfigResolver<'a> {
    config: &'a dyn ScopedConfig,
}

impl std::fmt::Debug for ConfigResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver").finish_non_exhaustive()
    }
}

impl<'a> ConfigResolver<'a> {
    /// Create resolver over a scoped configuration
    #[inline]
    #[must_use]
    pub fn new(config: &'a dyn ScopedConfig) -> Self {
        Self { config }
    }

    /// Explicitly declared boolean argument
    ///
    /// A declared argument that is not a boolean literal counts as absent.
    #[must_use]
    pub fn declared_flag(annotation: &Annotation, parameter: &str) -> Option<bool> {
        match annotation.declared(parameter) {
            Some(ArgValue::Bool(value)) => Some(*value),
            Some(other) => {
                tracing::debug!(
                    annotation = %annotation.identifier(),
                    parameter,
                    found = other.kind_name(),
                    "non-literal flag argument ignored"
                );
                None
            }
            None => None,
        }
    }

    /// Resolve flag and report which tier produced it
    #[must_use]
    pub fn resolve(
        &self,
        annotation: &Annotation,
        scope: &ElementPath,
        parameter: &str,
        key: &ConfigKey,
    ) -> Resolved {
        if let Some(value) = Self::declared_flag(annotation, parameter) {
            return Resolved {
                value,
                source: ResolutionSource::Explicit,
            };
        }

        let resolved = match self.config.find(key, scope) {
            Some(found) => Resolved {
                value: found.value,
                source: ResolutionSource::Configured(found.scope),
            },
            None => Resolved {
                value: key.default_value(),
                source: ResolutionSource::Default,
            },
        };
        tracing::debug!(
            key = key.name(),
            %scope,
            value = resolved.value,
            source = ?resolved.source,
            "flag resolved from configuration"
        );
        resolved
    }

    /// Resolve flag value
    #[inline]
    #[must_use]
    pub fn resolve_boolean(
        &self,
        annotation: &Annotation,
        scope: &ElementPath,
        parameter: &str,
        key: &ConfigKey,
    ) -> bool {
        self.resolve(annotation, scope, parameter, key).value
    }
}
