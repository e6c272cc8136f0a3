//! Token store interface consulted by the authentication stage.
use async_trait::async_trait;
use thiserror::Error;

use crate::middleware::auth::Identifier;
use crate::services::security::UserDetails;

/// Token store errors.
///
/// The authentication stage does not distinguish between these: every
/// variant ends up as `AppError::Unauthenticated`. They stay separate so the
/// cause can be logged.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token not found")]
    NotFound,
    #[error("token store backend error: {0}")]
    Backend(String),
}

/// Maps an opaque session token to a user identity.
///
/// Implementations are shared across in-flight requests (`Arc<dyn TokenStore>`)
/// and must be safe for concurrent use.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    async fn lookup(&self, identifier: &Identifier) -> Result<UserDetails, TokenStoreError>;

    // Role predicate used by the authorization stage.
    fn has_any_role(&self, details: &UserDetails, roles: &[&str]) -> bool {
        details.has_any_role(roles)
    }
}
