use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::dto::credentials::{CredentialsRequest, TokenResponse},
    error::AppError,
    services::security::accounts,
    state::AppState,
};

/// POST /tokens: exchange login + password for an opaque session token.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    req.validate().map_err(AppError::missing_parameter)?;

    let token = accounts::login(&state.db, req.login.trim(), &req.password).await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
