//! Enrichment lifecycle: pending words move to completed or failed.
//!
//! The scheduler enforces single-flight enrichment. While a job is claimed,
//! [`LifecycleScheduler::begin`] returns `None`, no matter how many words are
//! pending. Claiming and finishing are separate steps, so an async caller
//! can release its store lock while the provider call runs:
//!
//! ```no_run
//! use kotoba::enrichment::MockProvider;
//! use kotoba::lifecycle::LifecycleScheduler;
//! use kotoba::store::WordStore;
//!
//! let provider = MockProvider::new();
//! let mut store = WordStore::in_memory();
//! let mut scheduler = LifecycleScheduler::new();
//! store.add("猫");
//!
//! if let Some(job) = scheduler.begin(&store) {
//!     let outcome = job.run(&provider);
//!     scheduler.finish(&mut store, job, outcome);
//! }
//! ```

use serde::Serialize;
use tracing::{info, warn};

use crate::enrichment::EnrichmentProvider;
use crate::error::Result;
use crate::store::WordStore;
use crate::word::{Enrichment, Word, WordStatus};

/// A claimed enrichment: one pending word and its headword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentJob {
    pub word_id: String,
    pub headword: String,
}

impl EnrichmentJob {
    /// Call the provider. Errors become a `Failed` outcome.
    pub fn run(&self, provider: &dyn EnrichmentProvider) -> EnrichmentOutcome {
        EnrichmentOutcome::from_result(provider.name(), provider.enrich(&self.headword))
    }
}

/// Result of one provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    Enriched(Enrichment),
    Failed { provider: String, reason: String },
}

impl EnrichmentOutcome {
    pub fn from_result(provider: &str, result: Result<Enrichment>) -> Self {
        match result {
            Ok(enrichment) => EnrichmentOutcome::Enriched(enrichment),
            Err(e) => EnrichmentOutcome::Failed {
                provider: provider.to_string(),
                reason: e.to_string(),
            },
        }
    }
}

/// Tally of a drain run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    pub completed: usize,
    pub failed: usize,
}

impl EnrichmentReport {
    pub fn total(&self) -> usize {
        self.completed + self.failed
    }
}

/// Drives pending words through enrichment, one at a time.
#[derive(Debug, Default)]
pub struct LifecycleScheduler {
    in_flight: Option<EnrichmentJob>,
}

impl LifecycleScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The job currently claimed, if any.
    pub fn in_flight(&self) -> Option<&EnrichmentJob> {
        self.in_flight.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Claim the oldest pending word. Returns `None` if a job is already in
    /// flight or nothing is pending.
    pub fn begin(&mut self, store: &WordStore) -> Option<EnrichmentJob> {
        if self.in_flight.is_some() {
            return None;
        }

        let word = store.oldest_pending()?;
        let job = EnrichmentJob {
            word_id: word.id.clone(),
            headword: word.headword.clone(),
        };
        self.in_flight = Some(job.clone());
        Some(job)
    }

    /// Apply an outcome and release the in-flight slot.
    ///
    /// Returns the updated word. A job whose word was removed, or is no
    /// longer pending, is dropped and yields `None`.
    pub fn finish(
        &mut self,
        store: &mut WordStore,
        job: EnrichmentJob,
        outcome: EnrichmentOutcome,
    ) -> Option<Word> {
        if self.in_flight.as_ref() == Some(&job) {
            self.in_flight = None;
        }

        let still_pending = store
            .get(&job.word_id)
            .is_some_and(|w| w.status == WordStatus::Pending);
        if !still_pending {
            info!(id = %job.word_id, "word gone or already resolved, dropping enrichment result");
            return None;
        }

        store.update_with(&job.word_id, |word| match outcome {
            EnrichmentOutcome::Enriched(enrichment) => {
                info!(id = %word.id, headword = %word.headword, "word enriched");
                word.complete(enrichment);
            }
            EnrichmentOutcome::Failed { provider, reason } => {
                warn!(
                    id = %word.id,
                    headword = %word.headword,
                    %provider,
                    %reason,
                    "enrichment failed"
                );
                word.fail();
            }
        })
    }

    /// Enrich one pending word synchronously.
    pub fn step(
        &mut self,
        store: &mut WordStore,
        provider: &dyn EnrichmentProvider,
    ) -> Option<Word> {
        let job = self.begin(store)?;
        let outcome = job.run(provider);
        self.finish(store, job, outcome)
    }

    /// Enrich pending words one by one until none remain.
    pub fn run_pending(
        &mut self,
        store: &mut WordStore,
        provider: &dyn EnrichmentProvider,
    ) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();

        while let Some(job) = self.begin(store) {
            let outcome = job.run(provider);
            match self.finish(store, job, outcome).map(|w| w.status) {
                Some(WordStatus::Completed) => report.completed += 1,
                Some(WordStatus::Failed) => report.failed += 1,
                _ => {}
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::MockProvider;
    use crate::word::MEANING_PLACEHOLDER;

    #[test]
    fn test_begin_is_single_flight() {
        let mut store = WordStore::in_memory();
        store.add("一");
        store.add("二");
        let mut scheduler = LifecycleScheduler::new();

        let job = scheduler.begin(&store).unwrap();
        assert_eq!(job.headword, "一");
        assert!(scheduler.begin(&store).is_none());
        assert!(scheduler.is_busy());

        scheduler.finish(&mut store, job, EnrichmentOutcome::Enriched(Enrichment::default()));
        assert!(!scheduler.is_busy());
        assert_eq!(scheduler.begin(&store).unwrap().headword, "二");
    }

    #[test]
    fn test_failure_keeps_defaults() {
        let mut store = WordStore::in_memory();
        let word = store.add("猫").unwrap();
        let mut scheduler = LifecycleScheduler::new();

        let updated = scheduler.step(&mut store, &MockProvider::failing()).unwrap();

        assert_eq!(updated.id, word.id);
        assert_eq!(updated.status, WordStatus::Failed);
        assert_eq!(updated.meaning, MEANING_PLACEHOLDER);
        assert!(updated.reading.is_empty());
    }

    #[test]
    fn test_finish_on_removed_word_is_dropped() {
        let mut store = WordStore::in_memory();
        let word = store.add("猫").unwrap();
        let mut scheduler = LifecycleScheduler::new();

        let job = scheduler.begin(&store).unwrap();
        store.remove(&word.id);

        let outcome = EnrichmentOutcome::Enriched(Enrichment::default());
        let result = scheduler.finish(&mut store, job, outcome);
        assert!(result.is_none());
        assert!(!scheduler.is_busy());
        assert!(store.is_empty());
    }

    #[test]
    fn test_run_pending_drains_and_counts() {
        let mut store = WordStore::in_memory();
        store.add("猫");
        store.add("犬");
        store.add("鳥");
        let provider = MockProvider::new().with_failure("犬");

        let report = LifecycleScheduler::new().run_pending(&mut store, &provider);

        assert_eq!(report, EnrichmentReport { completed: 2, failed: 1 });
        assert!(store.pending().is_empty());
        assert_eq!(provider.calls(), 3);
    }

    #[test]
    fn test_terminal_words_are_not_reenriched() {
        let mut store = WordStore::in_memory();
        store.add("猫");
        let provider = MockProvider::new();
        let mut scheduler = LifecycleScheduler::new();

        scheduler.run_pending(&mut store, &provider);
        let report = scheduler.run_pending(&mut store, &provider);

        assert_eq!(report.total(), 0);
        assert_eq!(provider.calls(), 1);
    }
}
