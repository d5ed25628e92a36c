//! Memoized scope walks using moka
//!
//! [`CachedConfig`] wraps any [`ScopedConfig`] and remembers the result of
//! each `(key, scope)` walk. The wrapped configuration is treated as frozen
//! while cached; call [`CachedConfig::invalidate_all`] after changing it.

use crate::key::ConfigKey;
use crate::store::{ScopedConfig, ScopedValue};
use anvil_element::ElementPath;
use moka::sync::Cache;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of memoized walks
    pub entry_count: u64,
}

/// Caching wrapper around a scoped configuration
#[derive(Debug, Clone)]
pub struct CachedConfig<C> {
    inner: C,
    walks: Cache<(&'static str, ElementPath), Option<ScopedValue>>,
}

impl<C: ScopedConfig> CachedConfig<C> {
    /// Wrap `inner` with a cache holding up to `max_capacity` walks
    #[inline]
    #[must_use]
    pub fn new(inner: C, max_capacity: u64) -> Self {
        Self {
            inner,
            walks: Cache::new(max_capacity),
        }
    }

    /// Wrapped configuration
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Drop every memoized walk
    #[inline]
    pub fn invalidate_all(&self) {
        self.walks.invalidate_all();
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.walks.run_pending_tasks();
        CacheStats {
            entry_count: self.walks.entry_count(),
        }
    }
}

impl<C: ScopedConfig> ScopedConfig for CachedConfig<C> {
    fn find(&self, key: &ConfigKey, scope: &ElementPath) -> Option<ScopedValue> {
        self.walks.get_with((key.name(), scope.clone()), || {
            tracing::trace!(key = key.name(), %scope, "config cache miss");
            self.inner.find(key, scope)
        })
    }
}
