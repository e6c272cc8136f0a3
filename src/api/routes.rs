/*
 * Responsibility
 * - the route table: method + path → stage chain → handler
 * - structured 404 for anything unmatched
 *
 * | GET  /health      | -                                          |
 * | POST /api/users   | -                                          |
 * | POST /tokens      | -                                          |
 * | GET  /cards       | identify, authenticate                     |
 * | GET  /operations  | identify, authenticate, cache              |
 * | POST /operations  | identify, authenticate, authorize(SERVICE) |
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{
    cards::list_cards,
    health::health,
    operations::{list_operations, save_operations},
    tokens::issue_token,
    users::register,
};
use crate::api::{PipelineError, Stage, pipeline};
use crate::error::AppError;
use crate::services::security::ROLE_SERVICE;
use crate::state::AppState;

const AUTHENTICATED: &[Stage] = &[Stage::Identify, Stage::Authenticate];
const CACHED: &[Stage] = &[Stage::Identify, Stage::Authenticate, Stage::Cache];
const SERVICE_ONLY: &[Stage] = &[
    Stage::Identify,
    Stage::Authenticate,
    Stage::Authorize(&[ROLE_SERVICE]),
];

pub fn routes(state: AppState) -> Result<Router, PipelineError> {
    let operations = pipeline(&state, CACHED, get(list_operations))?
        .merge(pipeline(&state, SERVICE_ONLY, post(save_operations))?);

    let router = Router::new()
        .route("/health", get(health))
        .route("/api/users", post(register))
        .route("/tokens", post(issue_token))
        .route("/cards", pipeline(&state, AUTHENTICATED, get(list_cards))?)
        .route("/operations", operations)
        .fallback(not_found)
        .with_state(state);

    Ok(router)
}

async fn not_found() -> AppError {
    AppError::not_found("url")
}
