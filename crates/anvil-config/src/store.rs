//! Scoped configuration lookup
//!
//! A scope is an [`ElementPath`]. Lookups walk from the given scope outward
//! (class → outer class → package → project) and stop at the first scope that
//! configures the key. When none does, the key's compiled-in default applies,
//! so a lookup always produces a value.

use crate::key::ConfigKey;
use anvil_element::ElementPath;
use indexmap::IndexMap;

/// Value found for a key, with the scope that configured it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopedValue {
    /// Configured value
    pub value: bool,
    /// Scope the value was declared at
    pub scope: ElementPath,
}

/// Scoped configuration system
///
/// Implementations own the scope walk and any caching. Reads must be
/// synchronous and free of observable side effects.
pub trait ScopedConfig: Send + Sync {
    /// Nearest configured value for `key`, walking outward from `scope`
    ///
    /// `None` means no scope configures the key.
    fn find(&self, key: &ConfigKey, scope: &ElementPath) -> Option<ScopedValue>;

    /// Resolved value for `key`: the nearest configured value, else the
    /// key's default
    fn lookup(&self, key: &ConfigKey, scope: &ElementPath) -> bool {
        self.find(key, scope)
            .map_or(key.default_value(), |found| found.value)
    }
}

impl<C: ScopedConfig + ?Sized> ScopedConfig for &C {
    fn find(&self, key: &ConfigKey, scope: &ElementPath) -> Option<ScopedValue> {
        (**self).find(key, scope)
    }

    fn lookup(&self, key: &ConfigKey, scope: &ElementPath) -> bool {
        (**self).lookup(key, scope)
    }
}

impl<C: ScopedConfig + ?Sized> ScopedConfig for std::sync::Arc<C> {
    fn find(&self, key: &ConfigKey, scope: &ElementPath) -> Option<ScopedValue> {
        (**self).find(key, scope)
    }

    fn lookup(&self, key: &ConfigKey, scope: &ElementPath) -> bool {
        (**self).lookup(key, scope)
    }
}

/// Configuration with nothing set; every lookup yields the key default
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultsOnly;

impl ScopedConfig for DefaultsOnly {
    fn find(&self, _key: &ConfigKey, _scope: &ElementPath) -> Option<ScopedValue> {
        None
    }
}

/// In-memory scope tree of boolean settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayeredConfig {
    scopes: IndexMap<ElementPath, IndexMap<String, bool>>,
}

impl LayeredConfig {
    /// Create empty configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` at `scope`, returning the previous value at that scope
    pub fn set(&mut self, scope: ElementPath, key: impl Into<String>, value: bool) -> Option<bool> {
        self.scopes.entry(scope).or_default().insert(key.into(), value)
    }

    /// Builder form of [`Self::set`]
    #[inline]
    #[must_use]
    pub fn with(mut self, scope: ElementPath, key: impl Into<String>, value: bool) -> Self {
        self.set(scope, key, value);
        self
    }

    /// Set `key` at the project scope
    #[inline]
    #[must_use]
    pub fn with_project(self, key: impl Into<String>, value: bool) -> Self {
        self.with(ElementPath::root(), key, value)
    }

    /// Remove `key` from `scope`
    pub fn unset(&mut self, scope: &ElementPath, key: &str) -> Option<bool> {
        self.scopes.get_mut(scope)?.shift_remove(key)
    }

    /// Value declared exactly at `scope` (no walk)
    #[must_use]
    pub fn get_at(&self, scope: &ElementPath, key: &str) -> Option<bool> {
        self.scopes.get(scope)?.get(key).copied()
    }

    /// Scopes with at least one setting, in insertion order
    pub fn scopes(&self) -> impl Iterator<Item = &ElementPath> {
        self.scopes.keys()
    }

    /// Number of settings across all scopes
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.values().map(IndexMap::len).sum()
    }

    /// Check if nothing is configured
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge `other` into this configuration; `other` wins on conflicts
    pub fn merge(&mut self, other: LayeredConfig) {
        for (scope, settings) in other.scopes {
            let target = self.scopes.entry(scope).or_default();
            target.extend(settings);
        }
    }
}

impl ScopedConfig for LayeredConfig {
    fn find(&self, key: &ConfigKey, scope: &ElementPath) -> Option<ScopedValue> {
        let found = scope.scope_chain().find_map(|candidate| {
            self.get_at(&candidate, key.name())
                .map(|value| ScopedValue {
                    value,
                    scope: candidate,
                })
        });
        match &found {
            Some(hit) => tracing::trace!(key = key.name(), %scope, at = %hit.scope, "config hit"),
            None => tracing::trace!(key = key.name(), %scope, "config falls back to default"),
        }
        found
    }
}
