//! Authentication stage: identifier → `UserDetails` via the token store.
//!
//! Rejects with `Unauthenticated` and halts the chain when:
//! - the identification stage found no token
//! - the token store does not know the token
//! - the token store fails or does not answer within the lookup timeout
//!
//! The three cases are indistinguishable to the client; the cause is logged.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use super::context::RequestContext;
use crate::error::AppError;
use crate::services::security::{TokenStore, TokenStoreError, UserDetails};

/// State bound to the authentication stage at route registration.
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<dyn TokenStore>,
    lookup_timeout: Duration,
}

impl Authenticator {
    pub fn new(tokens: Arc<dyn TokenStore>, lookup_timeout: Duration) -> Self {
        Self {
            tokens,
            lookup_timeout,
        }
    }

    async fn resolve(&self, ctx: &RequestContext) -> Result<UserDetails, AppError> {
        let Some(identifier) = ctx.identifier() else {
            tracing::debug!("no identifier on request");
            return Err(AppError::Unauthenticated);
        };

        match tokio::time::timeout(self.lookup_timeout, self.tokens.lookup(identifier)).await {
            Ok(Ok(details)) => Ok(details),
            Ok(Err(TokenStoreError::NotFound)) => {
                tracing::debug!("unknown session token");
                Err(AppError::Unauthenticated)
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "token store lookup failed");
                Err(AppError::Unauthenticated)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "token store lookup timed out"
                );
                Err(AppError::Unauthenticated)
            }
        }
    }
}

pub async fn authenticate(
    State(auth): State<Authenticator>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions_mut()
        .remove::<RequestContext>()
        .unwrap_or_default();

    let details = auth.resolve(&ctx).await?;
    tracing::debug!(user_id = details.id, login = %details.login, "request authenticated");

    req.extensions_mut().insert(ctx.authenticated(details));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        http::{StatusCode, header},
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    use crate::api::extractors::CurrentUser;
    use crate::middleware::auth::identify;
    use crate::services::security::ROLE_USER;
    use crate::testing::{CallCounter, MemoryTokenStore, StoreBehavior};

    fn app(tokens: MemoryTokenStore, calls: CallCounter) -> Router {
        let auth = Authenticator::new(Arc::new(tokens), Duration::from_millis(50));

        Router::new()
            .route(
                "/me",
                get(move |CurrentUser(user): CurrentUser| async move {
                    calls.hit();
                    format!("{}:{}", user.id, user.login)
                }),
            )
            .layer(middleware::from_fn_with_state(auth, authenticate))
            .layer(middleware::from_fn(identify))
    }

    fn request(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/me");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_identifier_never_reaches_handler() {
        let calls = CallCounter::default();
        let res = app(MemoryTokenStore::default(), calls.clone())
            .oneshot(request(None))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test]
    async fn unknown_token_is_unauthenticated() {
        let calls = CallCounter::default();
        let res = app(MemoryTokenStore::default(), calls.clone())
            .oneshot(request(Some("nope")))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test]
    async fn store_failure_and_slow_store_are_unauthenticated() {
        for behavior in [StoreBehavior::Fail, StoreBehavior::Delay(Duration::from_millis(300))] {
            let calls = CallCounter::default();
            let tokens = MemoryTokenStore::default()
                .with_user("tok-1", UserDetails::new(7, "alice", [ROLE_USER]))
                .with_behavior(behavior);

            let res = app(tokens, calls.clone())
                .oneshot(request(Some("tok-1")))
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(calls.count(), 0);
        }
    }

    #[tokio::test]
    async fn resolved_user_reaches_handler_unchanged() {
        let details = UserDetails::new(7, "alice", [ROLE_USER]);
        let tokens = MemoryTokenStore::default().with_user("tok-1", details.clone());

        let auth = Authenticator::new(Arc::new(tokens), Duration::from_millis(50));
        let app = Router::new()
            .route(
                "/me",
                get(move |CurrentUser(user): CurrentUser| async move {
                    assert_eq!(*user, details);
                    StatusCode::NO_CONTENT
                }),
            )
            .layer(middleware::from_fn_with_state(auth, authenticate))
            .layer(middleware::from_fn(identify));

        let res = app.oneshot(request(Some("tok-1"))).await.unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
