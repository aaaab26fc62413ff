//! Review handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use chrono::Utc;
use serde::Deserialize;

use kotoba::Word;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for judging a word.
#[derive(Deserialize)]
pub struct ReviewRequest {
    pub correct: bool,
}

/// GET /api/review/due
pub async fn get_due(State(state): State<AppState>) -> Json<Vec<Word>> {
    let store = state.store.read().await;
    Json(store.find_due(Utc::now()).into_iter().cloned().collect())
}

/// POST /api/review/:id
pub async fn record_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<Word>, ApiError> {
    let Json(req) = payload?;
    let mut store = state.store.write().await;
    store
        .record_review(&id, req.correct, Utc::now())
        .map(Json)
        .ok_or_else(|| ApiError::WordNotFound(id.clone()))
}
