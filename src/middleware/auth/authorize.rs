//! Authorization stage: allow the request only if the authenticated user holds
//! at least one of the roles bound to the route.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use super::context::authentication;
use crate::error::AppError;
use crate::services::security::TokenStore;

/// Role requirement bound at route registration.
#[derive(Clone)]
pub struct RoleGuard {
    // Supplies the role predicate (`has_any_role`).
    tokens: Arc<dyn TokenStore>,
    roles: &'static [&'static str],
}

impl RoleGuard {
    pub fn new(tokens: Arc<dyn TokenStore>, roles: &'static [&'static str]) -> Self {
        Self { tokens, roles }
    }
}

pub async fn authorize(
    State(guard): State<RoleGuard>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = authentication(req.extensions())?;

    if !guard.tokens.has_any_role(&user, guard.roles) {
        tracing::info!(
            user_id = user.id,
            required = ?guard.roles,
            "request rejected: missing role"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}
