/*
 * Responsibility
 * - GET /operations: the caller's operation shortcuts (cached per user)
 * - POST /operations: a SERVICE caller replaces a user's list
 *
 * Notes
 * - after a save the user's cached GET /operations body is stale, so a DEL is
 *   sent in the background. It is best effort: a GET that missed before the
 *   save may finish its write-back after the DEL and re-cache the old list.
 *   That entry, like entries cached under a query string, only goes away
 *   with CACHE_TTL_SECONDS (never, when unset) or the next save.
 */
use axum::{Json, extract::State};

use crate::{
    api::{dto::operations::SaveOperationsRequest, extractors::CurrentUser},
    error::AppError,
    repos::operation_repo::{self, OperationEntry},
    services::cache::{cache_key, with_timeout},
    state::AppState,
};

pub const OPERATIONS_PATH: &str = "/operations";

pub async fn list_operations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<OperationEntry>>, AppError> {
    let operations = operation_repo::list_for_user(&state.db, user.id).await?;
    Ok(Json(operations))
}

pub async fn save_operations(
    State(state): State<AppState>,
    Json(req): Json<SaveOperationsRequest>,
) -> Result<Json<Vec<OperationEntry>>, AppError> {
    req.validate().map_err(AppError::missing_parameter)?;

    let saved = operation_repo::upsert(&state.db, req.user_id, &req.operations).await?;
    invalidate_cached_list(&state, req.user_id);

    Ok(Json(saved))
}

fn invalidate_cached_list(state: &AppState, user_id: i64) {
    let cache = state.cache.clone();
    let timeout = state.cache_timeout;
    let key = cache_key(user_id, OPERATIONS_PATH);

    tokio::spawn(async move {
        match with_timeout(timeout, cache.del(&key)).await {
            Ok(removed) => tracing::debug!(key = %key, removed, "cache entry invalidated"),
            Err(err) => tracing::warn!(key = %key, error = %err, "cache invalidation failed"),
        }
    });
}
