//! The hierarchy that resolves keys across mounted sources.

use crate::core::{HierarchyBuilder, MemoryStore, Value, ValueMap};
use crate::error::Result;
use crate::sources::ConfigSource;
use std::collections::HashMap;

/// Composes named configuration sources into one lookup surface.
///
/// A hierarchy owns three tiers:
///
/// 1. a local override store, written by [`set`](ConfigSource::set),
/// 2. the mounted sources, consulted in mount order,
/// 3. a defaults store, consulted last and never touched by `reset`.
///
/// [`get`](ConfigSource::get) returns the value from the first tier that has
/// the key and [`all`](ConfigSource::all) applies the same precedence to the
/// whole key space.
///
/// # Examples
///
/// ```rust
/// use tiered_config::prelude::*;
///
/// let mut config = Hierarchy::new();
/// config.defaults_mut().set("timeout", Value::from("30"));
/// config.mount("file", MemoryStore::new());
///
/// assert_eq!(config.get("timeout"), Some(&Value::from("30")));
///
/// config.set("timeout", Value::from("5"));
/// assert_eq!(config.get("timeout"), Some(&Value::from("5")));
///
/// config.reset(None);
/// assert_eq!(config.get("timeout"), Some(&Value::from("30")));
/// ```
pub struct Hierarchy {
    overrides: Box<dyn ConfigSource>,
    defaults: Box<dyn ConfigSource>,
    /// Mounted sources in precedence order.
    mounts: Vec<(String, Box<dyn ConfigSource>)>,
    /// Position of each mount name in `mounts`.
    index: HashMap<String, usize>,
}

impl Hierarchy {
    /// Create a hierarchy whose override and defaults tiers are empty memory stores.
    pub fn new() -> Self {
        Self::with_tiers(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()))
    }

    /// Create a new builder for constructing a hierarchy.
    pub fn builder() -> HierarchyBuilder {
        HierarchyBuilder::new()
    }

    pub(crate) fn with_tiers(
        overrides: Box<dyn ConfigSource>,
        defaults: Box<dyn ConfigSource>,
    ) -> Self {
        Self {
            overrides,
            defaults,
            mounts: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Mount a source under `name` and load it.
    ///
    /// An existing mount with the same name is replaced in place and keeps its
    /// precedence slot; a new name is appended after every existing mount.
    ///
    /// Errors from the implicit load are logged and swallowed: mounting always
    /// hands back a usable source, empty if nothing could be loaded. Call
    /// [`load`](ConfigSource::load) to observe load failures.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tiered_config::prelude::*;
    ///
    /// let mut config = Hierarchy::new();
    /// config.mount("first", MemoryStore::new()).set("x", Value::from("a"));
    /// config.mount("second", MemoryStore::new()).set("x", Value::from("b"));
    ///
    /// // Earlier mounts win.
    /// assert_eq!(config.get("x"), Some(&Value::from("a")));
    /// ```
    pub fn mount<S>(&mut self, name: &str, source: S) -> &mut dyn ConfigSource
    where
        S: ConfigSource + 'static,
    {
        let mut source: Box<dyn ConfigSource> = Box::new(source);
        load_logged(source.as_mut(), name);

        let slot = match self.index.get(name) {
            Some(&slot) => {
                tracing::debug!(mount = name, source = %source.name(), "replacing mounted source");
                self.mounts[slot].1 = source;
                slot
            }
            None => {
                tracing::debug!(mount = name, source = %source.name(), "mounting source");
                self.mounts.push((name.to_string(), source));
                let slot = self.mounts.len() - 1;
                self.index.insert(name.to_string(), slot);
                slot
            }
        };

        self.mounts[slot].1.as_mut()
    }

    /// The source mounted under `name`, if any.
    pub fn mounted(&self, name: &str) -> Option<&dyn ConfigSource> {
        self.index
            .get(name)
            .map(|&slot| self.mounts[slot].1.as_ref())
    }

    /// Mutable access to the source mounted under `name`, if any.
    pub fn mounted_mut(&mut self, name: &str) -> Option<&mut dyn ConfigSource> {
        match self.index.get(name) {
            Some(&slot) => Some(self.mounts[slot].1.as_mut()),
            None => None,
        }
    }

    /// Remove the source mounted under `name` and hand it back.
    ///
    /// Later mounts move up one precedence slot.
    pub fn unmount(&mut self, name: &str) -> Option<Box<dyn ConfigSource>> {
        let slot = self.index.remove(name)?;
        let (_, source) = self.mounts.remove(slot);
        for position in self.index.values_mut() {
            if *position > slot {
                *position -= 1;
            }
        }
        tracing::debug!(mount = name, source = %source.name(), "unmounted source");
        Some(source)
    }

    /// Mount names in precedence order.
    pub fn mount_names(&self) -> Vec<&str> {
        self.mounts.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// The defaults tier.
    pub fn defaults(&self) -> &dyn ConfigSource {
        self.defaults.as_ref()
    }

    /// Mutable access to the defaults tier.
    ///
    /// This is the only way to reset defaults; [`reset`](ConfigSource::reset)
    /// on the hierarchy leaves them alone.
    pub fn defaults_mut(&mut self) -> &mut dyn ConfigSource {
        self.defaults.as_mut()
    }

    /// The local override tier.
    pub fn overrides(&self) -> &dyn ConfigSource {
        self.overrides.as_ref()
    }

    /// Mutable access to the local override tier.
    pub fn overrides_mut(&mut self) -> &mut dyn ConfigSource {
        self.overrides.as_mut()
    }

    /// Every tier in `get` precedence order.
    fn tiers(&self) -> impl Iterator<Item = &(dyn ConfigSource + 'static)> {
        std::iter::once(self.overrides.as_ref())
            .chain(self.mounts.iter().map(|(_, source)| source.as_ref()))
            .chain(std::iter::once(self.defaults.as_ref()))
    }
}

/// Load a tier, logging and swallowing any failure.
pub(crate) fn load_logged(source: &mut dyn ConfigSource, tier: &str) {
    if let Err(e) = source.load() {
        tracing::warn!(
            tier = tier,
            source = %source.name(),
            error = %e,
            "implicit load failed, keeping source anyway"
        );
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for Hierarchy {
    /// Overrides first, then each mount in order, then defaults.
    fn get(&self, key: &str) -> Option<&Value> {
        self.tiers().find_map(|tier| tier.get(key))
    }

    /// Writes to the local override tier only.
    fn set(&mut self, key: &str, value: Value) {
        self.overrides.set(key, value);
    }

    /// Merges every tier; for each key the tier `get` would use wins.
    fn all(&self) -> ValueMap {
        let mut values = ValueMap::new();
        for tier in self.tiers() {
            for (key, value) in tier.all() {
                values.entry(key).or_insert(value);
            }
        }
        values
    }

    /// Resets every mounted source and the override tier. Defaults are kept.
    fn reset(&mut self, data: Option<ValueMap>) {
        tracing::debug!(
            mounts = self.mounts.len(),
            with_data = data.is_some(),
            "resetting hierarchy"
        );
        for (_, source) in &mut self.mounts {
            source.reset(data.clone());
        }
        self.overrides.reset(data);
    }

    /// Loads every mount in order, then defaults, then the override tier.
    ///
    /// Stops at the first failure. Sources loaded before it keep their new
    /// contents. The override tier goes last so a writable override file
    /// that does not exist yet cannot keep defaults from loading.
    fn load(&mut self) -> Result<()> {
        for (name, source) in &mut self.mounts {
            tracing::debug!(mount = %name, source = %source.name(), "loading source");
            source.load().map_err(|e| e.within(name))?;
        }
        self.defaults.load().map_err(|e| e.within("defaults"))?;
        self.overrides.load().map_err(|e| e.within("overrides"))
    }

    /// Saves every mount in order, then the override tier.
    ///
    /// Stops at the first failure. Defaults are never saved.
    fn save(&mut self) -> Result<()> {
        for (name, source) in &mut self.mounts {
            tracing::debug!(mount = %name, source = %source.name(), "saving source");
            source.save().map_err(|e| e.within(name))?;
        }
        self.overrides.save().map_err(|e| e.within("overrides"))
    }

    fn name(&self) -> String {
        format!("hierarchy[{}]", self.mount_names().join(","))
    }
}
