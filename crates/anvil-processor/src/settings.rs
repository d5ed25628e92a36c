//! Global processor settings
//!
//! Host-wide feature toggles, distinct from the scoped per-class
//! configuration. Processors read them in [`crate::Processor::is_enabled`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Global toggles consulted before dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Master switch for all processors
    pub enabled: bool,
    /// Processor names switched off individually
    pub disabled_processors: BTreeSet<String>,
    /// Named feature toggles processors may consult
    pub features: IndexMap<String, bool>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled_processors: BTreeSet::new(),
            features: IndexMap::new(),
        }
    }
}

impl GlobalSettings {
    /// Create default settings (everything enabled)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from TOML text
    ///
    /// # Errors
    /// Returns the TOML deserialization error
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Switch off one processor by name
    #[inline]
    #[must_use]
    pub fn with_disabled(mut self, processor: impl Into<String>) -> Self {
        self.disabled_processors.insert(processor.into());
        self
    }

    /// Set a feature toggle
    #[inline]
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>, on: bool) -> Self {
        self.features.insert(feature.into(), on);
        self
    }

    /// Feature toggle value, if set
    #[inline]
    #[must_use]
    pub fn feature(&self, feature: &str) -> Option<bool> {
        self.features.get(feature).copied()
    }

    /// Check the master switch and the per-processor list
    #[inline]
    #[must_use]
    pub fn allows(&self, processor: &str) -> bool {
        self.enabled && !self.disabled_processors.contains(processor)
    }
}
