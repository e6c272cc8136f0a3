/*
 * Responsibility
 * - session tokens (opaque ids bound to a user)
 * - token → user details lookup for the token store
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, FromRow)]
pub struct TokenUserRow {
    pub id: i64,
    pub login: String,
    pub roles: Vec<String>,
}

pub async fn insert(db: &PgPool, token: &str, user_id: i64) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO tokens (id, user_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(token)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn find_user_by_token(db: &PgPool, token: &str) -> RepoResult<Option<TokenUserRow>> {
    let row = sqlx::query_as::<_, TokenUserRow>(
        r#"
        SELECT u.id, u.login, u.roles
        FROM tokens t
        JOIN users u ON t.user_id = u.id
        WHERE t.id = $1
        "#,
    )
    .bind(token)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
