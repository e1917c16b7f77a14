//! Error types for tiered-config.

/// Result type alias for tiered-config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or saving configuration sources.
///
/// Reads and writes against an in-memory store never fail; only the
/// lifecycle operations that touch an external medium return errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to load configuration from a source.
    ///
    /// Covers an unreachable medium (missing file, refused connection,
    /// non-2xx response), a malformed payload and permission problems.
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    /// Failed to save configuration to a source.
    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    /// Failed to parse configuration text.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Generic error for other cases.
    #[error("Configuration error: {0}")]
    Other(String),
}

impl ConfigError {
    /// Returns `true` for errors raised while loading a source.
    ///
    /// Parse failures count as load failures: they only happen while
    /// reading a medium.
    pub fn is_load(&self) -> bool {
        matches!(self, Self::LoadError(_) | Self::ParseError(_))
    }

    /// Returns `true` for errors raised while saving a source.
    pub fn is_save(&self) -> bool {
        matches!(self, Self::SaveError(_))
    }

    /// Prefix the error message with the name of the source it came from,
    /// keeping the error kind.
    pub(crate) fn within(self, source: &str) -> Self {
        match self {
            Self::LoadError(msg) => Self::LoadError(format!("source '{}': {}", source, msg)),
            Self::ParseError(msg) => Self::LoadError(format!("source '{}': {}", source, msg)),
            Self::SaveError(msg) => Self::SaveError(format!("source '{}': {}", source, msg)),
            Self::Other(msg) => Self::Other(format!("source '{}': {}", source, msg)),
        }
    }
}
