//! # tiered-config
//!
//! Hierarchical configuration assembled from named, mountable key/value sources.
//!
//! ## Overview
//!
//! A [`Hierarchy`](core::Hierarchy) resolves every key through three tiers:
//!
//! - a local override store written by `set`,
//! - the mounted sources in the order they were mounted,
//! - a defaults store that `reset` never touches.
//!
//! Sources read their data from a medium (environment variables, command-line
//! flags, JSON files, JSON over HTTP) and all share the
//! [`ConfigSource`](sources::ConfigSource) contract, which the hierarchy
//! implements too so hierarchies can be nested.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tiered_config::prelude::*;
//! use tiered_config::sources::EnvSource;
//!
//! # fn example() -> tiered_config::error::Result<()> {
//! let mut config = Hierarchy::new();
//! config.defaults_mut().set("timeout", Value::from("30"));
//!
//! // Earlier mounts take precedence over later ones.
//! let pinned: MemoryStore = [("timeout", "10")].into_iter().collect();
//! config.mount("pinned", pinned);
//! config.mount("env", EnvSource::new("APP_"));
//!
//! // Mounting swallows load errors; load explicitly to see them.
//! config.load()?;
//!
//! let timeout = config.get("timeout");
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `json` (default): [`JsonFileSource`](sources::JsonFileSource) and JSON flattening
//! - `remote` (default): [`UrlSource`](sources::UrlSource), a blocking HTTP JSON source
//! - `cli` (default): [`ArgvSource`](sources::ArgvSource), built from clap matches

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{Hierarchy, HierarchyBuilder, MemoryStore, Value, ValueMap};
    pub use crate::error::{ConfigError, Result};
    pub use crate::sources::ConfigSource;
}
