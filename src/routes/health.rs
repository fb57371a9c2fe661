use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().await;
    let body = json!({
        "status": "ok",
        "phase": tracker.phase(),
        "questions": tracker.bank().len(),
    });
    (StatusCode::OK, Json(body))
}
