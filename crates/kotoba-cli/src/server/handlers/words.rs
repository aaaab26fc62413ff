//! Word collection handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use kotoba::{Word, WordPatch};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query parameters for listing words.
#[derive(Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring of headword or meaning.
    pub q: Option<String>,
}

/// Request body for adding a word.
#[derive(Deserialize)]
pub struct AddWordRequest {
    #[serde(alias = "kanji")]
    pub headword: String,
}

/// GET /api/words
pub async fn list_words(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Word>> {
    let store = state.store.read().await;
    let words = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => store.search(q).into_iter().cloned().collect(),
        _ => store.list().to_vec(),
    };
    Json(words)
}

/// POST /api/words
///
/// The word is created pending; the enrichment worker picks it up.
pub async fn add_word(
    State(state): State<AppState>,
    payload: Result<Json<AddWordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Word>), ApiError> {
    let Json(req) = payload?;
    let mut store = state.store.write().await;
    let word = store
        .add(&req.headword)
        .ok_or_else(|| ApiError::BadRequest("Headword is blank".to_string()))?;
    Ok((StatusCode::CREATED, Json(word)))
}

/// GET /api/words/:id
pub async fn get_word(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Word>, ApiError> {
    let store = state.store.read().await;
    store
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::WordNotFound(id.clone()))
}

/// PATCH /api/words/:id
pub async fn update_word(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<WordPatch>, JsonRejection>,
) -> Result<Json<Word>, ApiError> {
    let Json(patch) = payload?;
    let mut store = state.store.write().await;
    store
        .update(&id, patch)
        .map(Json)
        .ok_or_else(|| ApiError::WordNotFound(id.clone()))
}

/// DELETE /api/words/:id
pub async fn delete_word(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiError::WordNotFound(id.clone()))
}
