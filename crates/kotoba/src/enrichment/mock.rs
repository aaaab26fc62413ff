//! Mock enrichment provider for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{KotobaError, Result};
use crate::word::Enrichment;

use super::provider::EnrichmentProvider;

/// Mock provider that returns predictable responses for testing.
///
/// Known headwords get their canned enrichment, headwords marked as failing
/// return an error, and anything else gets a generated placeholder entry.
/// Clones share call counters.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    responses: HashMap<String, Enrichment>,
    failing: HashSet<String>,
    fail_all: bool,
    delay: Option<Duration>,
    stats: Arc<CallStats>,
}

#[derive(Debug, Default)]
struct CallStats {
    calls: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Return `enrichment` for `headword`.
    pub fn with_response(mut self, headword: impl Into<String>, enrichment: Enrichment) -> Self {
        self.responses.insert(headword.into(), enrichment);
        self
    }

    /// Fail every call for `headword`.
    pub fn with_failure(mut self, headword: impl Into<String>) -> Self {
        self.failing.insert(headword.into());
        self
    }

    /// Sleep for `delay` inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Total calls so far.
    pub fn calls(&self) -> usize {
        self.stats.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were ever running at once.
    pub fn peak_concurrency(&self) -> usize {
        self.stats.peak.load(Ordering::SeqCst)
    }
}

impl EnrichmentProvider for MockProvider {
    fn enrich(&self, headword: &str) -> Result<Enrichment> {
        self.stats.calls.fetch_add(1, Ordering::SeqCst);
        let active = self.stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.peak.fetch_max(active, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let result = if self.fail_all || self.failing.contains(headword) {
            Err(KotobaError::provider(
                self.name(),
                format!("no entry for '{}'", headword),
            ))
        } else if let Some(enrichment) = self.responses.get(headword) {
            Ok(enrichment.clone())
        } else {
            Ok(Enrichment {
                reading: format!("{}（よみ）", headword),
                meaning: format!("meaning of {}", headword),
                example: format!("{}を使った例文です。", headword),
                example_translation: format!("An example sentence using {}.", headword),
                mnemonic: format!("Picture {} vividly.", headword),
            })
        };

        self.stats.active.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn name(&self) -> &str {
        "mock"
    }
}
