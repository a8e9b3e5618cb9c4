use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the loaded recognizer and vocabulary size.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-ranker-api",
        "recognizer": state.recognizer.name(),
        "vocabulary_size": state.vocabulary.len()
    }))
}
