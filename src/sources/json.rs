//! JSON file configuration source and JSON flattening.

use super::ConfigSource;
use crate::core::{MemoryStore, Value, ValueMap};
use crate::error::{ConfigError, Result};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Separator placed between the keys of nested objects.
pub const KEY_SEPARATOR: &str = ":";

/// Parse JSON text into the flat key space used by every JSON-backed source.
///
/// Nested objects become `parent:child` keys and arrays are joined into a
/// single comma-separated string. Every leaf becomes a [`Value::String`];
/// `null` leaves are dropped. The flattening is one-way: nothing here
/// rebuilds the nesting.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] if the text is not JSON or its root is
/// not an object.
///
/// # Examples
///
/// ```rust
/// use tiered_config::core::Value;
/// use tiered_config::sources::flatten_json;
///
/// let map = flatten_json(r#"{"obj":{"inner":"x"},"arr":[1,2,3]}"#).unwrap();
/// assert_eq!(map.get("obj:inner"), Some(&Value::from("x")));
/// assert_eq!(map.get("arr"), Some(&Value::from("1,2,3")));
/// ```
pub fn flatten_json(text: &str) -> Result<ValueMap> {
    let json: JsonValue = serde_json::from_str(text)
        .map_err(|e| ConfigError::ParseError(format!("invalid JSON: {}", e)))?;
    flatten_value(json)
}

/// Flatten an already parsed JSON document; see [`flatten_json`].
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] if the root is not an object.
pub fn flatten_value(json: JsonValue) -> Result<ValueMap> {
    match json {
        JsonValue::Object(map) => {
            let mut output = ValueMap::new();
            flatten_segment(map, "", &mut output);
            Ok(output)
        }
        other => Err(ConfigError::ParseError(format!(
            "expected JSON object at root level, found {}",
            json_kind(&other)
        ))),
    }
}

fn flatten_segment(
    segment: serde_json::Map<String, JsonValue>,
    path: &str,
    output: &mut ValueMap,
) {
    for (key, value) in segment {
        let key = if path.is_empty() {
            key
        } else {
            format!("{}{}{}", path, KEY_SEPARATOR, key)
        };

        match value {
            JsonValue::Object(nested) => flatten_segment(nested, &key, output),
            JsonValue::Array(items) => {
                let joined = items.iter().map(render_scalar).collect::<Vec<_>>().join(",");
                output.insert(key, Value::String(joined));
            }
            JsonValue::Null => {}
            scalar => {
                output.insert(key, Value::String(render_scalar(&scalar)));
            }
        }
    }
}

/// Render a JSON value as text: strings unquoted, everything else as JSON.
fn render_scalar(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// JSON file configuration source.
///
/// Loads a JSON object from `path` into the flattened key space described
/// on [`flatten_json`] and saves the current keys back as a single-level
/// JSON object. The file does not need to exist: the first successful
/// [`save`](ConfigSource::save) creates it.
///
/// Saving a file that was loaded from nested JSON writes it back flat.
///
/// # Examples
///
/// ```rust,no_run
/// use tiered_config::prelude::*;
/// use tiered_config::sources::JsonFileSource;
///
/// # fn example() -> tiered_config::error::Result<()> {
/// let mut source = JsonFileSource::new("config.json");
/// source.set("abcd", Value::from("1234"));
/// source.save()?;
///
/// source.reset(None);
/// source.load()?;
/// assert_eq!(source.get("abcd"), Some(&Value::from("1234")));
/// # Ok(())
/// # }
/// ```
pub struct JsonFileSource {
    store: MemoryStore,
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source backed by the JSON file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: MemoryStore::new(),
            path: path.into(),
        }
    }

    /// Seed the store with `data` before the first load.
    ///
    /// Mounting the source loads it, which replaces the seed if the file
    /// exists; a missing file leaves the seed in place.
    pub fn with_data(mut self, data: ValueMap) -> Self {
        self.store.reset(Some(data));
        self
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<ValueMap> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::NotFound => "file not found".to_string(),
                ErrorKind::PermissionDenied => "permission denied".to_string(),
                _ => e.to_string(),
            };
            ConfigError::LoadError(format!("{}: {}", self.path.display(), reason))
        })?;

        flatten_json(&text).map_err(|e| match e {
            ConfigError::ParseError(msg) => {
                ConfigError::LoadError(format!("{}: {}", self.path.display(), msg))
            }
            other => other,
        })
    }

    fn write(&self) -> Result<()> {
        // JSON has no NaN or infinity; write those as text so they reload.
        let sorted: BTreeMap<String, Value> = self
            .store
            .all()
            .into_iter()
            .map(|(key, value)| match value {
                Value::Float(f) if !f.is_finite() => (key, Value::String(f.to_string())),
                other => (key, other),
            })
            .collect();
        let body = serde_json::to_vec_pretty(&sorted)
            .map_err(|e| ConfigError::SaveError(format!("failed to serialize: {}", e)))?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let save_error =
            |e: std::io::Error| ConfigError::SaveError(format!("{}: {}", self.path.display(), e));
        let mut file = options.open(&self.path).map_err(save_error)?;
        file.write_all(&body).map_err(save_error)?;
        file.flush().map_err(save_error)
    }
}

impl ConfigSource for JsonFileSource {
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
        let data = self.read()?;
        tracing::debug!(source = %self.name(), keys = data.len(), "loaded JSON file");
        self.store.reset(Some(data));
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.write()?;
        tracing::debug!(source = %self.name(), keys = self.store.len(), "saved JSON file");
        Ok(())
    }

    fn name(&self) -> String {
        format!("json:{}", self.path.display())
    }
}
