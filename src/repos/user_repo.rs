/*
 * Responsibility
 * - SQLx operations on the users table
 * - takes a PgPool, returns RepoError so handlers can map it to AppError
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, FromRow)]
pub struct CredentialsRow {
    pub id: i64,
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

/// Insert a user. A login that is already taken yields `RepoError::Conflict`.
pub async fn create(
    db: &PgPool,
    login: &str,
    password_hash: &str,
    roles: &[&str],
) -> RepoResult<i64> {
    let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (login, password, roles)
        VALUES ($1, $2, $3)
        ON CONFLICT DO NOTHING
        RETURNING id
        "#,
    )
    .bind(login)
    .bind(password_hash)
    .bind(roles)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    // ON CONFLICT DO NOTHING returns no row for a duplicate login.
    id.ok_or(RepoError::Conflict)
}

pub async fn find_credentials(db: &PgPool, login: &str) -> RepoResult<Option<CredentialsRow>> {
    let row = sqlx::query_as::<_, CredentialsRow>(
        r#"
        SELECT id, password
        FROM users
        WHERE login = $1
        "#,
    )
    .bind(login)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
