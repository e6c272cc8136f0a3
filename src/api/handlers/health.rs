/*
 * Responsibility
 * - GET /health (liveness, no pipeline stages)
 * - reports which cache backend the process is wired to
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "cache": state.cache.backend_name()})),
    )
}
