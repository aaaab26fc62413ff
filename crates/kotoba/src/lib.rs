//! Kotoba: vocabulary flashcards with LLM enrichment and spaced review.
//!
//! Users add headwords. An enrichment provider fills in reading, meaning,
//! an example sentence, its translation and a mnemonic. Reviews move each
//! word's mastery up or down and push the next review out exponentially.
//!
//! # Core Principles
//!
//! - **One owner**: the [`WordStore`] holds every word and persists the whole
//!   collection after each change
//! - **Explicit events**: the store notifies subscribers; the scheduler reacts
//!   to those notifications rather than polling
//! - **Single-flight enrichment**: at most one provider call is in flight
//! - **Failure is state**: a failed enrichment marks the word `failed` and
//!   never surfaces as an error
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use kotoba::{LifecycleScheduler, MockProvider, ReviewSession, WordStore};
//!
//! let mut store = WordStore::in_memory();
//! store.add("猫");
//!
//! let report = LifecycleScheduler::new().run_pending(&mut store, &MockProvider::new());
//! println!("Enriched: {}", report.completed);
//!
//! let now = Utc::now();
//! let mut session = ReviewSession::due(&store, now);
//! while session.current().is_some() {
//!     session.answer_into(&mut store, true, now);
//! }
//! ```

pub mod config;
pub mod enrichment;
pub mod error;
pub mod lifecycle;
pub mod review;
pub mod slot;
pub mod stats;
pub mod store;
pub mod word;

pub use config::{KotobaConfig, ProviderKind};
pub use enrichment::{
    DeepSeekProvider, EnrichmentProvider, GeminiProvider, MockProvider, ProviderChain,
    ProviderConfig,
};
pub use error::{KotobaError, Result};
pub use lifecycle::{EnrichmentJob, EnrichmentOutcome, EnrichmentReport, LifecycleScheduler};
pub use review::{Judgment, ReviewSession, SessionState};
pub use slot::{DurableSlot, FileSlot, MemorySlot};
pub use stats::StudyStats;
pub use store::{StoreEvent, SubscriptionId, WordStore};
pub use word::{Enrichment, JlptLevel, Mastery, Word, WordPatch, WordStatus};
