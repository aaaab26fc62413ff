//! Background enrichment driven by store change notifications.

use std::sync::Arc;

use tracing::{debug, error};

use kotoba::{EnrichmentOutcome, EnrichmentReport, WordStatus};

use super::state::AppState;

/// Enrich pending words forever, sleeping until the store changes.
pub async fn run(state: AppState) {
    loop {
        let report = drain(&state).await;
        if report.total() > 0 {
            debug!(completed = report.completed, failed = report.failed, "enrichment pass done");
        }
        state.wake.notified().await;
    }
}

/// Enrich pending words one at a time until none remain.
///
/// The provider call runs on the blocking pool with no lock held, so the
/// API stays responsive while a request is in flight.
pub async fn drain(state: &AppState) -> EnrichmentReport {
    let mut report = EnrichmentReport::default();

    loop {
        let job = {
            let store = state.store.read().await;
            let mut scheduler = state.scheduler.lock().await;
            scheduler.begin(&store)
        };
        let Some(job) = job else {
            break;
        };

        let provider = Arc::clone(&state.provider);
        let claimed = job.clone();
        let outcome = match tokio::task::spawn_blocking(move || claimed.run(&*provider)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(error = %e, headword = %job.headword, "enrichment task panicked");
                EnrichmentOutcome::Failed {
                    provider: state.provider_name().to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let mut store = state.store.write().await;
        let mut scheduler = state.scheduler.lock().await;
        match scheduler.finish(&mut store, job, outcome).map(|w| w.status) {
            Some(WordStatus::Completed) => report.completed += 1,
            Some(WordStatus::Failed) => report.failed += 1,
            _ => {}
        }
    }

    report
}
