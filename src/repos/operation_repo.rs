/*
 * Responsibility
 * - per-user operation shortcuts, one row per user
 * - the list is stored as a JSONB document
 */
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, types::Json};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationEntry {
    pub icon: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, FromRow)]
struct OperationsRow {
    operations: Json<Vec<OperationEntry>>,
}

/// Returns an empty list when the user has no stored operations.
pub async fn list_for_user(db: &PgPool, user_id: i64) -> RepoResult<Vec<OperationEntry>> {
    let row = sqlx::query_as::<_, OperationsRow>(
        r#"
        SELECT operations
        FROM operations
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|r| r.operations.0).unwrap_or_default())
}

/// Insert or replace the user's operation list.
pub async fn upsert(
    db: &PgPool,
    user_id: i64,
    operations: &[OperationEntry],
) -> RepoResult<Vec<OperationEntry>> {
    let row = sqlx::query_as::<_, OperationsRow>(
        r#"
        INSERT INTO operations (user_id, operations)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET operations = EXCLUDED.operations
        RETURNING operations
        "#,
    )
    .bind(user_id)
    .bind(Json(operations))
    .fetch_one(db)
    .await?;

    Ok(row.operations.0)
}
