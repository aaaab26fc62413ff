//! Axum application setup.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;
use super::worker;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Word collection
        .route("/words", get(handlers::list_words).post(handlers::add_word))
        .route(
            "/words/:id",
            get(handlers::get_word)
                .patch(handlers::update_word)
                .delete(handlers::delete_word),
        )
        // Review
        .route("/review/due", get(handlers::get_due))
        .route("/review/:id", post(handlers::record_review))
        // Summary
        .route("/stats", get(handlers::get_stats))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Start the enrichment worker and the web server.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    tokio::spawn(worker::run(state.clone()));

    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use kotoba::{MockProvider, WordStore};

    fn test_state() -> AppState {
        AppState::new(WordStore::in_memory(), Arc::new(MockProvider::new()))
    }

    async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_add_and_list_words() {
        let state = test_state();

        let body = json!({"headword": " 猫 "});
        let (status, word) = send(&state, "POST", "/api/words", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(word["kanji"], "猫");
        assert_eq!(word["status"], "pending");
        assert_eq!(word["masteryLevel"], 0);

        let (status, words) = send(&state, "GET", "/api/words", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(words.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_headword_is_rejected() {
        let state = test_state();

        let blank = json!({"headword": "  "});
        let (status, body) = send(&state, "POST", "/api/words", Some(blank)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        assert!(state.store.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_patch_and_delete() {
        let state = test_state();
        let id = state.store.write().await.add("猫").unwrap().id;
        let uri = format!("/api/words/{}", id);

        let patch = json!({"meaning": "cat", "level": "N5"});
        let (status, word) = send(&state, "PATCH", &uri, Some(patch)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(word["meaning"], "cat");
        assert_eq!(word["level"], "N5");

        let (status, _) = send(&state, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&state, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_patch_cannot_change_status() {
        let state = test_state();
        let id = state.store.write().await.add("猫").unwrap().id;
        let uri = format!("/api/words/{}", id);

        let patch = json!({"meaning": "cat", "status": "completed"});
        let (status, body) = send(&state, "PATCH", &uri, Some(patch)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        let store = state.store.read().await;
        let word = store.get(&id).unwrap();
        assert_eq!(word.status, kotoba::WordStatus::Pending);
        assert_ne!(word.meaning, "cat");
    }

    #[tokio::test]
    async fn test_review_moves_word_out_of_due() {
        let state = test_state();
        let id = state.store.write().await.add("猫").unwrap().id;

        let (_, due) = send(&state, "GET", "/api/review/due", None).await;
        assert_eq!(due.as_array().unwrap().len(), 1);

        let uri = format!("/api/review/{}", id);
        let (status, word) = send(&state, "POST", &uri, Some(json!({"correct": true}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(word["masteryLevel"], 1);

        let (_, due) = send(&state, "GET", "/api/review/due", None).await;
        assert!(due.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_review_unknown_word() {
        let state = test_state();

        let judgment = json!({"correct": false});
        let (status, _) = send(&state, "POST", "/api/review/missing", Some(judgment)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let state = test_state();
        let id = state.store.write().await.add("猫").unwrap().id;
        let uri = format!("/api/review/{}", id);

        let (status, body) = send(&state, "POST", &uri, Some(json!({"correct": "maybe"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        assert_eq!(state.store.read().await.get(&id).unwrap().mastery_level.level(), 0);
    }

    #[tokio::test]
    async fn test_stats_and_health() {
        let state = test_state();
        state.store.write().await.add("猫");

        let (status, stats) = send(&state, "GET", "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total"], 1);
        assert_eq!(stats["due"], 1);
        assert_eq!(stats["byStatus"]["pending"], 1);
        assert_eq!(stats["masteryDistribution"][0], 1);
        assert!(stats["enriching"].is_null());

        let (status, health) = send(&state, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["status"], "ok");
        assert_eq!(health["provider"], "mock");
        assert_eq!(health["words"], 1);
    }
}
