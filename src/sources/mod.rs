//! Configuration source implementations.

mod config_source;
mod env;

#[cfg(feature = "cli")]
mod argv;
#[cfg(feature = "json")]
mod json;
#[cfg(feature = "remote")]
mod remote;

pub use config_source::ConfigSource;
pub use env::EnvSource;

#[cfg(feature = "cli")]
pub use argv::ArgvSource;
#[cfg(feature = "json")]
pub use json::{JsonFileSource, KEY_SEPARATOR, flatten_json, flatten_value};
#[cfg(feature = "remote")]
pub use remote::{DEFAULT_TIMEOUT, HttpAuth, UrlSource, UrlSourceBuilder};
