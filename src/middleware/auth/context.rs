/*
 * Responsibility
 * - the request-scoped context carried through the stage chain
 *   (request extensions, one value per request)
 * - stages replace it rather than mutating it in place
 *
 * Notes
 * - identity is a sum type: a stage never has to guess whether the user was
 *   resolved, it matches on Identity.
 */
use std::sync::Arc;

use axum::http::Extensions;

use crate::error::AppError;
use crate::services::security::UserDetails;

/// Opaque bearer token presented by the client. Not validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier(String);

impl Identifier {
    /// Blank tokens count as no token at all.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default)]
pub enum Identity {
    #[default]
    Absent,
    Resolved(Arc<UserDetails>),
}

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    identifier: Option<Identifier>,
    identity: Identity,
}

impl RequestContext {
    pub fn new(identifier: Option<Identifier>) -> Self {
        Self {
            identifier,
            identity: Identity::Absent,
        }
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.identifier.as_ref()
    }

    /// Replacement context carrying the resolved user.
    pub fn authenticated(self, details: UserDetails) -> Self {
        Self {
            identifier: self.identifier,
            identity: Identity::Resolved(Arc::new(details)),
        }
    }

    /// The authenticated user, or `Unauthenticated` if the authentication
    /// stage has not run (or did not resolve anyone).
    pub fn user(&self) -> Result<&Arc<UserDetails>, AppError> {
        match &self.identity {
            Identity::Resolved(details) => Ok(details),
            Identity::Absent => Err(AppError::Unauthenticated),
        }
    }
}

/// Fetch the authenticated user from the request extensions.
pub fn authentication(extensions: &Extensions) -> Result<Arc<UserDetails>, AppError> {
    extensions
        .get::<RequestContext>()
        .ok_or(AppError::Unauthenticated)?
        .user()
        .cloned()
}
