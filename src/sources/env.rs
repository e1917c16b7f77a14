//! Environment variable configuration source.

use super::ConfigSource;
use crate::core::{MemoryStore, Value, ValueMap};
use crate::error::Result;

/// Environment variable configuration source.
///
/// Reads the whole process environment on every load. When a prefix is set,
/// it is stripped from the start of each variable name that carries it, so
/// `APP_PORT=8080` read with prefix `APP_` is stored as `PORT`. Variables
/// without the prefix are kept under their own name unless
/// [`prefixed_only`](Self::prefixed_only) is set.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
///
/// # Examples
///
/// ```rust
/// use tiered_config::prelude::*;
/// use tiered_config::sources::EnvSource;
///
/// let mut config = Hierarchy::new();
/// config.mount("env", EnvSource::new("APP_").prefixed_only());
/// let port = config.get("PORT");
/// ```
pub struct EnvSource {
    store: MemoryStore,
    prefix: String,
    prefixed_only: bool,
}

impl EnvSource {
    /// Create a new environment variable source.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Literal prefix stripped from variable names (e.g. "APP_"),
    ///   or an empty string to keep every name as is
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            store: MemoryStore::new(),
            prefix: prefix.into(),
            prefixed_only: false,
        }
    }

    /// Ignore variables that do not start with the prefix.
    pub fn prefixed_only(mut self) -> Self {
        self.prefixed_only = true;
        self
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Map one variable name to its key, or `None` if it should be skipped.
    fn key_for<'a>(&self, name: &'a str) -> Option<&'a str> {
        let key = match name.strip_prefix(self.prefix.as_str()) {
            Some(stripped) if !self.prefix.is_empty() => stripped,
            _ if self.prefixed_only && !self.prefix.is_empty() => return None,
            _ => name,
        };
        (!key.is_empty()).then_some(key)
    }

    fn collect<I>(&self, vars: I) -> ValueMap
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut data = ValueMap::new();
        for (name, value) in vars {
            if let Some(key) = self.key_for(&name) {
                data.insert(key.to_string(), Value::String(value));
            }
        }
        data
    }
}

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.store.set(key, value)
    }

    fn all(&self) -> ValueMap {
        self.store.all()
    }

    fn reset(&mut self, data: Option<ValueMap>) {
        self.store.reset(data)
    }

    fn load(&mut self) -> Result<()> {
        let vars = std::env::vars_os().filter_map(|(name, value)| {
            Some((name.into_string().ok()?, value.into_string().ok()?))
        });
        let data = self.collect(vars);
        tracing::debug!(source = %self.name(), keys = data.len(), "loaded environment");
        self.store.reset(Some(data));
        Ok(())
    }

    fn name(&self) -> String {
        format!("env:{}*", self.prefix)
    }
}
