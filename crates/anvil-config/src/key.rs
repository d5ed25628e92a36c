//! Configuration keys

use std::fmt::{self, Display, Formatter};

/// Named boolean setting with its compiled-in default
///
/// Keys are declared as constants next to the processor that reads them:
///
/// ```rust
/// use anvil_config::ConfigKey;
///
/// const NO_IS_PREFIX: ConfigKey = ConfigKey::new("lombok.getter.noIsPrefix", false);
/// assert!(!NO_IS_PREFIX.default_value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigKey {
    name: &'static str,
    default_value: bool,
}

impl ConfigKey {
    /// Declare key
    #[inline]
    #[must_use]
    pub const fn new(name: &'static str, default_value: bool) -> Self {
        Self {
            name,
            default_value,
        }
    }

    /// Key name as written in configuration documents
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Value used when no scope configures the key
    #[inline]
    #[must_use]
    pub const fn default_value(&self) -> bool {
        self.default_value
    }
}

impl Display for ConfigKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
