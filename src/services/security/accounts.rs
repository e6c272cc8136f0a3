/*
 * Responsibility
 * - user registration (hash password, insert user with the USER role)
 * - login (verify password, issue an opaque session token)
 */
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::AppError;
use crate::repos::{token_repo, user_repo};
use crate::services::security::{ROLE_USER, password};

pub async fn register(db: &PgPool, login: &str, plain_password: &str) -> Result<i64, AppError> {
    let plain = plain_password.to_owned();
    // Argon2 is CPU-bound; keep it off the async workers.
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| {
            error!(error = %e, "password hashing task failed");
            AppError::Internal
        })?
        .map_err(|e| {
            error!(error = %e, "failed to hash password");
            AppError::Internal
        })?;

    let id = user_repo::create(db, login, &hash, &[ROLE_USER]).await?;
    debug!(user_id = id, "registered user");

    Ok(id)
}

pub async fn login(db: &PgPool, login: &str, plain_password: &str) -> Result<String, AppError> {
    let credentials = user_repo::find_credentials(db, login)
        .await?
        .ok_or_else(user_not_found)?;

    let plain = plain_password.to_owned();
    let stored = credentials.password_hash;
    let verified = tokio::task::spawn_blocking(move || password::verify_password(&plain, &stored))
        .await
        .map_err(|e| {
            error!(error = %e, "password verification task failed");
            AppError::Internal
        })?;

    if !verified {
        return Err(user_not_found());
    }

    let token = Uuid::new_v4().to_string();
    token_repo::insert(db, &token, credentials.id).await?;
    debug!(user_id = credentials.id, "issued session token");

    Ok(token)
}

// Unknown login and wrong password are reported the same way.
fn user_not_found() -> AppError {
    AppError::bad_request("USER_NOT_FOUND", "user not found")
}
