//! Enrichment provider trait and shared configuration.

use std::time::Duration;

use crate::error::Result;
use crate::word::Enrichment;

/// Configuration shared by the HTTP providers.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Model to use (e.g., "deepseek-chat").
    pub model: String,

    /// Maximum tokens in response. Gemini ignores it: thinking models spend
    /// their output budget before any text arrives.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,

    /// Per-request timeout. Bounds how long one slow call can hold up the
    /// pending queue.
    pub timeout: Duration,

    /// Language the meaning and translation are written in.
    pub gloss_language: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "deepseek-chat".to_string(),
            max_tokens: 1024,
            temperature: 0.3,
            timeout: Duration::from_secs(60),
            gloss_language: "Simplified Chinese".to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_gloss_language(mut self, language: impl Into<String>) -> Self {
        self.gloss_language = language.into();
        self
    }
}

/// Something that can enrich a headword.
///
/// Implementations must be thread-safe (Send + Sync) so the server worker
/// can call them off the async runtime.
pub trait EnrichmentProvider: Send + Sync {
    /// Look up reading, meaning, example, translation and mnemonic for a
    /// headword.
    ///
    /// Any error, including a response that is not exactly the five
    /// enrichment fields, counts as a failed attempt. Callers do not retry.
    fn enrich(&self, headword: &str) -> Result<Enrichment>;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

impl<P: EnrichmentProvider + ?Sized> EnrichmentProvider for Box<P> {
    fn enrich(&self, headword: &str) -> Result<Enrichment> {
        (**self).enrich(headword)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: EnrichmentProvider + ?Sized> EnrichmentProvider for std::sync::Arc<P> {
    fn enrich(&self, headword: &str) -> Result<Enrichment> {
        (**self).enrich(headword)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
