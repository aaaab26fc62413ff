//! Error types for the Kotoba library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Kotoba operations.
#[derive(Debug, Error)]
pub enum KotobaError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Durable slot could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// An enrichment provider call failed.
    #[error("Provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    /// Provider answered, but not with the expected enrichment object.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Configuration error (missing credential, bad value).
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KotobaError {
    /// Shorthand for a provider failure.
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        KotobaError::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for Kotoba operations.
pub type Result<T> = std::result::Result<T, KotobaError>;
