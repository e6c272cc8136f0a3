//! Identification stage: bearer token → `RequestContext`.
//!
//! Never rejects. A request without a token goes on with an empty context and
//! the authentication stage decides what to do with it.

use axum::{
    body::Body,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use super::context::{Identifier, RequestContext};

/// Cookie consulted when there is no `Authorization` header.
pub const TOKEN_COOKIE: &str = "token";

pub async fn identify(mut req: Request<Body>, next: Next) -> Response {
    let identifier = extract_identifier(req.headers());
    if identifier.is_none() {
        tracing::debug!(path = %req.uri().path(), "request carries no identifier");
    }

    // A fresh context per request; whatever was there before is discarded.
    req.extensions_mut().insert(RequestContext::new(identifier));

    next.run(req).await
}

/// `Authorization: Bearer <token>` first, then the `token` cookie.
pub fn extract_identifier(headers: &HeaderMap) -> Option<Identifier> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<Identifier> {
    let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth.strip_prefix("Bearer ")?;
    Identifier::new(token)
}

fn cookie_token(headers: &HeaderMap) -> Option<Identifier> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .and_then(|(_, value)| Identifier::new(value))
}
