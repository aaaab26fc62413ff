//! Stats and health handlers.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;

use kotoba::StudyStats;

use crate::server::state::AppState;

/// Response for the stats endpoint.
#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: StudyStats,
    /// Headword currently being enriched, if any.
    pub enriching: Option<String>,
}

/// Response for the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
    pub words: usize,
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.read().await;
    let scheduler = state.scheduler.lock().await;

    Json(StatsResponse {
        stats: StudyStats::collect(store.list(), Utc::now()),
        enriching: scheduler.in_flight().map(|job| job.headword.clone()),
    })
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let words = state.store.read().await.len();
    Json(HealthResponse {
        status: "ok",
        provider: state.provider_name().to_string(),
        words,
    })
}
