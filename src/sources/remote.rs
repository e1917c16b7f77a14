//! Remote HTTP/HTTPS JSON configuration source.

use super::ConfigSource;
use super::json::flatten_json;
use crate::core::{MemoryStore, Value, ValueMap};
use crate::error::{ConfigError, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Default request timeout for [`UrlSource`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Authentication method for HTTP requests.
#[derive(Clone)]
pub enum HttpAuth {
    /// No authentication
    None,
    /// Bearer token authentication
    Bearer(String),
    /// Basic authentication (username, password)
    Basic(String, String),
}

/// HTTP-based JSON configuration source.
///
/// Fetches a JSON object with a blocking GET and flattens it the same way
/// [`JsonFileSource`](super::JsonFileSource) does. The source is read-only:
/// [`save`](ConfigSource::save) does nothing. A failed load keeps whatever
/// was loaded before.
///
/// # Examples
///
/// ```rust,no_run
/// use tiered_config::prelude::*;
/// use tiered_config::sources::UrlSource;
/// use std::time::Duration;
///
/// # fn example() -> tiered_config::error::Result<()> {
/// let source = UrlSource::builder()
///     .with_url("https://config.example.com/api/config")
///     .with_auth_token("secret-token")
///     .with_timeout(Duration::from_secs(5))
///     .build()?;
///
/// let mut config = Hierarchy::new();
/// config.mount("global", source);
/// # Ok(())
/// # }
/// ```
pub struct UrlSource {
    store: MemoryStore,
    url: String,
    client: Client,
    auth: HttpAuth,
}

impl UrlSource {
    /// Create a source for `url` with the default timeout and no authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::builder().with_url(url).build()
    }

    /// Create a new builder for constructing a URL source.
    pub fn builder() -> UrlSourceBuilder {
        UrlSourceBuilder::new()
    }

    /// The URL fetched on load.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and flatten the remote document.
    fn fetch(&self) -> Result<ValueMap> {
        let request = match &self.auth {
            HttpAuth::None => self.client.get(&self.url),
            HttpAuth::Bearer(token) => self.client.get(&self.url).bearer_auth(token),
            HttpAuth::Basic(username, password) => {
                self.client.get(&self.url).basic_auth(username, Some(password))
            }
        };

        let response = request
            .send()
            .map_err(|e| ConfigError::LoadError(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::LoadError(format!(
                "HTTP request failed with status {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .text()
            .map_err(|e| ConfigError::LoadError(format!("Failed to read response body: {}", e)))?;

        flatten_json(&body).map_err(|e| match e {
            ConfigError::ParseError(msg) => {
                ConfigError::LoadError(format!("malformed response from {}: {}", self.url, msg))
            }
            other => other,
        })
    }
}

impl ConfigSource for UrlSource {
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
        let data = self.fetch()?;
        tracing::debug!(source = %self.name(), keys = data.len(), "loaded remote JSON");
        self.store.reset(Some(data));
        Ok(())
    }

    fn name(&self) -> String {
        format!("url:{}", self.url)
    }
}

/// Builder for constructing a `UrlSource`.
///
/// # Examples
///
/// ```rust,no_run
/// use tiered_config::sources::UrlSource;
///
/// # fn example() -> tiered_config::error::Result<()> {
/// let source = UrlSource::builder()
///     .with_url("https://config.example.com/api/config")
///     .with_basic_auth("username", "password")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct UrlSourceBuilder {
    url: Option<String>,
    auth: HttpAuth,
    timeout: Duration,
}

impl UrlSourceBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: None,
            auth: HttpAuth::None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the URL to fetch configuration from.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set Bearer token authentication.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth = HttpAuth::Bearer(token.into());
        self
    }

    /// Set Basic authentication.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = HttpAuth::Basic(username.into(), password.into());
        self
    }

    /// Set the request timeout.
    ///
    /// Default is 10 seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the URL source.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No URL is provided
    /// - The HTTP client cannot be constructed
    pub fn build(self) -> Result<UrlSource> {
        let url = self
            .url
            .ok_or_else(|| ConfigError::Other("URL is required for UrlSource".to_string()))?;

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ConfigError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(UrlSource {
            store: MemoryStore::new(),
            url,
            client,
            auth: self.auth,
        })
    }
}

impl Default for UrlSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
