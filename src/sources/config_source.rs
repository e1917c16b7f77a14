//! Configuration source trait.

use crate::core::{Value, ValueMap};
use crate::error::Result;

/// Trait for configuration sources.
///
/// Every source is a key/value store plus an optional medium it can be
/// loaded from and saved to. [`MemoryStore`](crate::core::MemoryStore) is the
/// plain store, the types in [`sources`](crate::sources) wrap one and add a
/// medium, and [`Hierarchy`](crate::core::Hierarchy) implements the trait over
/// a whole set of mounted sources so hierarchies can be nested.
///
/// Implement this trait to create custom configuration sources (e.g.
/// databases or key-value stores).
pub trait ConfigSource: Send + Sync {
    /// Look up a key, returning `None` when it is not set.
    fn get(&self, key: &str) -> Option<&Value>;

    /// Insert or replace a key.
    fn set(&mut self, key: &str, value: Value);

    /// Snapshot of every key currently set.
    fn all(&self) -> ValueMap;

    /// Replace the whole contents with `data`, or clear them when `None`.
    ///
    /// This never merges with what was there before.
    fn reset(&mut self, data: Option<ValueMap>);

    /// Pull data from the external medium and replace the contents with it.
    ///
    /// Sources without a medium succeed without doing anything.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LoadError`](crate::error::ConfigError::LoadError)
    /// if the medium cannot be read or its payload cannot be parsed. The
    /// previous contents are kept in that case.
    fn load(&mut self) -> Result<()> {
        Ok(())
    }

    /// Write the current contents to the external medium.
    ///
    /// Read-only sources and sources without a medium succeed without doing
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SaveError`](crate::error::ConfigError::SaveError)
    /// if the medium cannot be written.
    fn save(&mut self) -> Result<()> {
        Ok(())
    }

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;
}

impl<S: ConfigSource + ?Sized> ConfigSource for Box<S> {
    fn get(&self, key: &str) -> Option<&Value> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        (**self).set(key, value)
    }

    fn all(&self) -> ValueMap {
        (**self).all()
    }

    fn reset(&mut self, data: Option<ValueMap>) {
        (**self).reset(data)
    }

    fn load(&mut self) -> Result<()> {
        (**self).load()
    }

    fn save(&mut self) -> Result<()> {
        (**self).save()
    }

    fn name(&self) -> String {
        (**self).name()
    }
}
