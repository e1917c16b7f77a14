//! Command-line flag configuration source.

use super::ConfigSource;
use crate::core::{MemoryStore, Value, ValueMap};
use crate::error::Result;
use clap::ArgMatches;

/// Command-line flag configuration source.
///
/// Holds an explicitly parsed flag set rather than reading a process-wide
/// registry. Build it from clap's [`ArgMatches`] with
/// [`from_matches`](Self::from_matches), or from plain `(name, value)` pairs
/// with [`new`](Self::new). Each load copies the flags into the store,
/// stripping the prefix from names that begin with it (`--test.asd=1` with
/// prefix `test.` is stored as `asd`).
///
/// # Examples
///
/// ```rust
/// use clap::{Arg, Command};
/// use tiered_config::prelude::*;
/// use tiered_config::sources::ArgvSource;
///
/// let matches = Command::new("app")
///     .arg(Arg::new("app.port").long("app.port"))
///     .get_matches_from(["app", "--app.port", "9090"]);
///
/// let mut config = Hierarchy::new();
/// config.mount("argv", ArgvSource::from_matches(&matches, "app."));
/// assert_eq!(config.get("port"), Some(&Value::from("9090")));
/// ```
pub struct ArgvSource {
    store: MemoryStore,
    flags: Vec<(String, String)>,
    prefix: String,
}

impl ArgvSource {
    /// Create a source from already parsed `(name, value)` flag pairs.
    pub fn new<I, K, V>(flags: I, prefix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            store: MemoryStore::new(),
            flags: flags
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            prefix: prefix.into(),
        }
    }

    /// Capture every argument in `matches` that carries a value.
    ///
    /// Values come from the raw command line (or the argument's default), so
    /// they are stored exactly as typed. Arguments given several times are
    /// joined with `,`.
    pub fn from_matches(matches: &ArgMatches, prefix: impl Into<String>) -> Self {
        let mut flags = Vec::new();
        for id in matches.ids() {
            let Ok(Some(raw)) = matches.try_get_raw(id.as_str()) else {
                continue;
            };
            let joined = raw
                .map(|value| value.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(",");
            flags.push((id.as_str().to_string(), joined));
        }
        Self::new(flags, prefix)
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn key_for<'a>(&self, name: &'a str) -> &'a str {
        if self.prefix.is_empty() {
            return name;
        }
        name.strip_prefix(self.prefix.as_str()).unwrap_or(name)
    }
}

impl ConfigSource for ArgvSource {
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
        let data: ValueMap = self
            .flags
            .iter()
            .map(|(name, value)| (self.key_for(name), value))
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.to_string(), Value::from(value.as_str())))
            .collect();
        tracing::debug!(source = %self.name(), keys = data.len(), "loaded command-line flags");
        self.store.reset(Some(data));
        Ok(())
    }

    fn name(&self) -> String {
        format!("argv:{}*", self.prefix)
    }
}
