use async_trait::async_trait;
use sqlx::PgPool;

use crate::middleware::auth::Identifier;
use crate::repos::token_repo;
use crate::services::security::{TokenStore, TokenStoreError, UserDetails};

/// Postgres-backed token store (`tokens` joined with `users`).
#[derive(Clone, Debug)]
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn lookup(&self, identifier: &Identifier) -> Result<UserDetails, TokenStoreError> {
        let row = token_repo::find_user_by_token(&self.pool, identifier.as_str())
            .await
            .map_err(|e| TokenStoreError::Backend(e.to_string()))?
            .ok_or(TokenStoreError::NotFound)?;

        Ok(UserDetails::new(row.id, row.login, row.roles))
    }
}
