//! In-memory key/value store.

use crate::core::{Value, ValueMap};
use crate::sources::ConfigSource;

/// The most basic configuration source, backed by a `HashMap`.
///
/// It has no medium: `load` and `save` succeed without doing anything. Every
/// other source keeps its data in one of these.
///
/// # Examples
///
/// ```rust
/// use tiered_config::prelude::*;
///
/// let mut store = MemoryStore::new();
/// store.set("port", Value::from("8080"));
/// assert_eq!(store.get("port"), Some(&Value::from("8080")));
///
/// store.reset(None);
/// assert!(store.get("port").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    data: ValueMap,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `data`.
    pub fn from_map(data: ValueMap) -> Self {
        Self { data }
    }

    /// Number of keys set.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no key is set.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether `key` is set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryStore
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ConfigSource for MemoryStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    fn all(&self) -> ValueMap {
        self.data.clone()
    }

    fn reset(&mut self, data: Option<ValueMap>) {
        self.data = data.unwrap_or_default();
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}
