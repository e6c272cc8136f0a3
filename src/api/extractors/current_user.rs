use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::middleware::auth::authentication;
use crate::services::security::UserDetails;

/// The user resolved by the authentication stage.
///
/// Rejects with 401 when the route has no authentication stage in front of it.
pub struct CurrentUser(pub Arc<UserDetails>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authentication(&parts.extensions).map(CurrentUser)
    }
}
