//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::{Mutex, Notify, RwLock};

use kotoba::{EnrichmentProvider, LifecycleScheduler, WordStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The word collection. Writes persist before the lock is released.
    pub store: Arc<RwLock<WordStore>>,
    /// Single-flight enrichment guard. Lock after `store`, never before.
    pub scheduler: Arc<Mutex<LifecycleScheduler>>,
    /// Provider (usually a fallback chain) used by the enrichment worker.
    pub provider: Arc<dyn EnrichmentProvider>,
    /// Woken by every store change.
    pub wake: Arc<Notify>,
}

impl AppState {
    /// Create new application state.
    ///
    /// Subscribes to `store` so any change wakes the enrichment worker.
    pub fn new(mut store: WordStore, provider: Arc<dyn EnrichmentProvider>) -> Self {
        let wake = Arc::new(Notify::new());
        let notify = Arc::clone(&wake);
        store.subscribe(move |_| notify.notify_one());

        Self {
            store: Arc::new(RwLock::new(store)),
            scheduler: Arc::new(Mutex::new(LifecycleScheduler::new())),
            provider,
            wake,
        }
    }

    /// Name of the configured provider (for display).
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}
