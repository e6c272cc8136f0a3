use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::dto::credentials::{CredentialsRequest, RegisteredResponse},
    error::AppError,
    services::security::accounts,
    state::AppState,
};

/// POST /api/users
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<RegisteredResponse>), AppError> {
    req.validate().map_err(AppError::missing_parameter)?;

    let id = accounts::register(&state.db, req.login.trim(), &req.password).await?;

    Ok((StatusCode::CREATED, Json(RegisteredResponse { id })))
}
