use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct CardRow {
    pub id: i64,
    pub number: String,
    pub balance: i64,
    pub issuer: String,
    pub holder: String,
    pub user_id: i64,
    pub status: String,
    pub created: DateTime<Utc>,
}

pub async fn list_all(db: &PgPool, limit: i64) -> RepoResult<Vec<CardRow>> {
    let rows = sqlx::query_as::<_, CardRow>(
        r#"
        SELECT id, number, balance, issuer, holder, user_id, status, created
        FROM cards
        ORDER BY id
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_by_user(db: &PgPool, user_id: i64, limit: i64) -> RepoResult<Vec<CardRow>> {
    let rows = sqlx::query_as::<_, CardRow>(
        r#"
        SELECT id, number, balance, issuer, holder, user_id, status, created
        FROM cards
        WHERE user_id = $1
        ORDER BY id
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
