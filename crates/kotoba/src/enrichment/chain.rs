//! Ordered fallback across several providers.

use tracing::{debug, warn};

use crate::error::{KotobaError, Result};
use crate::word::Enrichment;

use super::provider::EnrichmentProvider;

/// Tries providers in order; the first success wins.
///
/// An empty chain, or one where every provider fails, reports a single
/// error listing each failure.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn EnrichmentProvider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to the end of the chain.
    pub fn with(mut self, provider: impl EnrichmentProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn push(&mut self, provider: Box<dyn EnrichmentProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names, in the order they are tried.
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl EnrichmentProvider for ProviderChain {
    fn enrich(&self, headword: &str) -> Result<Enrichment> {
        if self.providers.is_empty() {
            return Err(KotobaError::Config(
                "no enrichment provider configured".to_string(),
            ));
        }

        let mut failures = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            match provider.enrich(headword) {
                Ok(enrichment) => {
                    debug!(provider = provider.name(), headword, "enrichment succeeded");
                    return Ok(enrichment);
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        headword,
                        error = %e,
                        "provider failed, trying next"
                    );
                    failures.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        Err(KotobaError::provider(self.name(), failures.join("; ")))
    }

    fn name(&self) -> &str {
        "chain"
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::MockProvider;

    #[test]
    fn test_first_success_wins() {
        let primary = MockProvider::new();
        let secondary = MockProvider::new();
        let chain = ProviderChain::new()
            .with(primary.clone())
            .with(secondary.clone());

        chain.enrich("猫").unwrap();
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[test]
    fn test_falls_back_in_order() {
        let primary = MockProvider::failing();
        let secondary = MockProvider::new();
        let chain = ProviderChain::new()
            .with(primary.clone())
            .with(secondary.clone());

        let result = chain.enrich("猫").unwrap();
        assert!(result.meaning.contains("猫"));
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[test]
    fn test_all_failing_lists_each_failure() {
        let chain = ProviderChain::new()
            .with(MockProvider::failing())
            .with(MockProvider::failing());

        let err = chain.enrich("猫").unwrap_err().to_string();
        assert_eq!(err.matches("mock:").count(), 2);
    }

    #[test]
    fn test_empty_chain_fails() {
        let chain = ProviderChain::new();
        assert!(chain.is_empty());
        assert!(matches!(chain.enrich("猫"), Err(KotobaError::Config(_))));
    }
}
