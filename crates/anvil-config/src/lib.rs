//! Anvil Scoped Configuration
//!
//! Boolean settings resolved against lexical scopes. A lookup for a key at
//! `com.acme.Order.Line` consults `com.acme.Order.Line`, `com.acme.Order`,
//! `com.acme`, `com` and the project scope in turn, then falls back to the
//! key's compiled-in default.
//!
//! # Architecture
//!
//! ```text
//! LayeredConfig → CachedConfig (moka)
//!       ↑
//! ScopedConfig::lookup
//! ```
//!
//! # Example
//!
//! ```rust
//! use anvil_config::{ConfigKey, LayeredConfig, ScopedConfig};
//!
//! const CHAIN: ConfigKey = ConfigKey::new("lombok.accessors.chain", false);
//!
//! let config = LayeredConfig::new()
//!     .with_project(CHAIN.name(), false)
//!     .with("com.acme.Order".parse().unwrap(), CHAIN.name(), true);
//!
//! assert!(config.lookup(&CHAIN, &"com.acme.Order".parse().unwrap()));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod key;
pub mod store;

pub use cache::{CacheStats, CachedConfig};
pub use key::ConfigKey;
pub use store::{DefaultsOnly, LayeredConfig, ScopedConfig, ScopedValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
