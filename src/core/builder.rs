//! Builder for constructing Hierarchy instances.

use crate::core::hierarchy::load_logged;
use crate::core::{Hierarchy, MemoryStore, ValueMap};
use crate::sources::ConfigSource;

/// Builder for constructing a [`Hierarchy`].
///
/// Provides a fluent interface for composing the tiers of a hierarchy.
/// Sources are mounted in the order they are added, so the first
/// [`mount`](Self::mount) has the highest precedence among mounted sources.
///
/// # Examples
///
/// ```rust,no_run
/// use tiered_config::prelude::*;
/// use tiered_config::sources::EnvSource;
///
/// let pinned: MemoryStore = [("host", "db.internal")].into_iter().collect();
/// let config = Hierarchy::builder()
///     .with_defaults([("port", "8080"), ("host", "localhost")])
///     .mount("pinned", pinned)
///     .mount("env", EnvSource::new("APP_"))
///     .build();
///
/// let port = config.get("port");
/// ```
pub struct HierarchyBuilder {
    overrides: Option<Box<dyn ConfigSource>>,
    defaults: Option<Box<dyn ConfigSource>>,
    mounts: Vec<(String, Box<dyn ConfigSource>)>,
}

impl HierarchyBuilder {
    /// Create a new builder with memory-backed override and defaults tiers.
    pub fn new() -> Self {
        Self {
            overrides: None,
            defaults: None,
            mounts: Vec::new(),
        }
    }

    /// Use a memory store holding `defaults` as the defaults tier.
    pub fn with_defaults<I, K, V>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<crate::core::Value>,
    {
        self.defaults = Some(Box::new(defaults.into_iter().collect::<MemoryStore>()));
        self
    }

    /// Use an arbitrary source as the defaults tier.
    ///
    /// The source is loaded by [`build`](Self::build) (failures are logged,
    /// not returned) and whenever the hierarchy is loaded, but never saved and
    /// never reset by the hierarchy.
    pub fn with_defaults_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.defaults = Some(Box::new(source));
        self
    }

    /// Use an arbitrary source as the local override tier.
    ///
    /// The source is loaded by [`build`](Self::build) (failures are logged,
    /// not returned). A writable source here makes
    /// [`save`](ConfigSource::save) on the hierarchy persist values written
    /// with `set`.
    pub fn with_overrides_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.overrides = Some(Box::new(source));
        self
    }

    /// Queue a source to be mounted under `name`.
    ///
    /// Adding the same name twice replaces the earlier source but keeps its
    /// position, exactly like [`Hierarchy::mount`].
    pub fn mount<S: ConfigSource + 'static>(mut self, name: &str, source: S) -> Self {
        let source: Box<dyn ConfigSource> = Box::new(source);
        match self.mounts.iter_mut().find(|(existing, _)| existing == name) {
            Some(entry) => entry.1 = source,
            None => self.mounts.push((name.to_string(), source)),
        }
        self
    }

    /// Build the hierarchy, mounting every queued source in order.
    ///
    /// Sources given to [`with_defaults_source`](Self::with_defaults_source)
    /// and [`with_overrides_source`](Self::with_overrides_source) are loaded
    /// first, then each mount performs its implicit load. Failures are
    /// logged, not returned. Call [`load`](ConfigSource::load) on the result
    /// when load errors must be observed.
    pub fn build(self) -> Hierarchy {
        let overrides = match self.overrides {
            Some(mut source) => {
                load_logged(source.as_mut(), "overrides");
                source
            }
            None => Box::new(MemoryStore::new()),
        };
        let defaults = match self.defaults {
            Some(mut source) => {
                load_logged(source.as_mut(), "defaults");
                source
            }
            None => Box::new(MemoryStore::new()),
        };

        let mut hierarchy = Hierarchy::with_tiers(overrides, defaults);
        for (name, source) in self.mounts {
            hierarchy.mount(&name, source);
        }
        hierarchy
    }

    /// Build the hierarchy from a map of defaults only.
    pub fn build_with_defaults(self, defaults: ValueMap) -> Hierarchy {
        self.with_defaults_source(MemoryStore::from_map(defaults))
            .build()
    }
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
