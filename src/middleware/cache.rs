//! Response cache stage.
//!
//! Wraps a downstream handler:
//! - hit: the stored bytes are returned as a 200 JSON response and the handler
//!   is not called
//! - miss: the handler runs once, its body is captured, the response is sent,
//!   and the captured bytes are written back in a detached task
//!
//! The stage is user-agnostic and keyed by path only. Per-user namespacing
//! lives in the `from_cache` / `to_cache` functions it is built with (see
//! [`CacheStage::user_scoped`]).
//!
//! A cache failure never fails the request: read errors degrade to a miss and
//! write-back errors are logged. There is no read-after-write guarantee
//! between concurrent requests for the same key.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::{OriginalUri, State},
    http::{HeaderName, HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::middleware::auth::RequestContext;
use crate::services::cache::{CacheClient, CacheError, cache_key, with_timeout};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Reads the cached body for `path`. `Err(CacheError::NotInCache)` is a miss.
pub type FromCacheFn =
    Arc<dyn Fn(RequestContext, String) -> BoxFuture<'static, Result<Bytes, CacheError>> + Send + Sync>;

/// Stores the captured body for `path`.
pub type ToCacheFn = Arc<
    dyn Fn(RequestContext, String, Bytes) -> BoxFuture<'static, Result<(), CacheError>>
        + Send
        + Sync,
>;

pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Only the body is stored, not the handler's headers. A hit is always sent
/// as `content-type: application/json`, so the stage belongs in front of JSON
/// handlers only; a miss keeps whatever headers the handler set.
#[derive(Clone)]
pub struct CacheStage {
    from_cache: FromCacheFn,
    to_cache: ToCacheFn,
}

impl CacheStage {
    pub fn new(from_cache: FromCacheFn, to_cache: ToCacheFn) -> Self {
        Self {
            from_cache,
            to_cache,
        }
    }

    /// Stage backed by `cache`, keyed by `cache_key(user id, path)`.
    ///
    /// Every store call is bounded by `timeout`. A context without an
    /// authenticated user yields `CacheError::Unscoped` for both directions,
    /// so nothing is ever cached outside a user namespace.
    pub fn user_scoped(cache: Arc<dyn CacheClient>, timeout: Duration) -> Self {
        let reader = cache.clone();
        let from_cache: FromCacheFn = Arc::new(
            move |ctx: RequestContext, path: String| -> BoxFuture<'static, Result<Bytes, CacheError>> {
                let cache = reader.clone();
                Box::pin(async move {
                    let user = ctx.user().map_err(|_| CacheError::Unscoped)?;
                    let key = cache_key(user.id, &path);

                    with_timeout(timeout, cache.get_bytes(&key))
                        .await?
                        .map(Bytes::from)
                        .ok_or(CacheError::NotInCache)
                })
            },
        );

        let writer = cache;
        let to_cache: ToCacheFn = Arc::new(
            move |ctx: RequestContext,
                  path: String,
                  body: Bytes|
                  -> BoxFuture<'static, Result<(), CacheError>> {
                let cache = writer.clone();
                Box::pin(async move {
                    let user = ctx.user().map_err(|_| CacheError::Unscoped)?;
                    let key = cache_key(user.id, &path);

                    with_timeout(timeout, cache.set_bytes(&key, &body)).await
                })
            },
        );

        Self::new(from_cache, to_cache)
    }
}

pub async fn cache(State(stage): State<CacheStage>, req: Request<Body>, next: Next) -> Response {
    let ctx = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();
    let path = request_path(&req);

    match (stage.from_cache)(ctx.clone(), path.clone()).await {
        Ok(body) => {
            tracing::debug!(path = %path, bytes = body.len(), "served from cache");
            return hit_response(body);
        }
        Err(err) if err.is_miss() => {
            tracing::debug!(path = %path, "cache miss");
        }
        Err(err) => {
            tracing::warn!(path = %path, error = %err, "cache read failed, passing through");
        }
    }

    let response = next.run(req).await;

    // Only a successful response may populate the cache.
    if response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let captured = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(path = %path, error = %err, "failed to read handler response body");
            return AppError::Internal.into_response();
        }
    };

    let to_cache = stage.to_cache.clone();
    let write_path = path.clone();
    let write_body = captured.clone();
    // Fire-and-forget: the response does not wait for the write.
    tokio::spawn(async move {
        match to_cache(ctx, write_path.clone(), write_body).await {
            Ok(()) => tracing::debug!(path = %write_path, "response cached"),
            Err(err) => tracing::warn!(path = %write_path, error = %err, "cache write failed"),
        }
    });

    parts.headers.insert(X_CACHE, HeaderValue::from_static("MISS"));
    Response::from_parts(parts, Body::from(captured))
}

fn hit_response(body: Bytes) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (X_CACHE, HeaderValue::from_static("HIT")),
        ],
        body,
    )
        .into_response()
}

// Path plus query, as the client sent it (nesting does not strip prefixes).
fn request_path(req: &Request<Body>) -> String {
    let uri = req
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(req.uri());

    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    use crate::services::security::{ROLE_USER, UserDetails};
    use crate::testing::{CallCounter, MemoryCache, StoreBehavior, body_bytes, eventually};

    const TIMEOUT: Duration = Duration::from_millis(50);

    // Stands in for the authentication stage.
    async fn as_user(mut req: Request<Body>, next: Next) -> Response {
        let ctx = RequestContext::default().authenticated(UserDetails::new(7, "alice", [ROLE_USER]));
        req.extensions_mut().insert(ctx);
        next.run(req).await
    }

    fn app(cache: MemoryCache, calls: CallCounter, status: StatusCode) -> Router {
        let stage = CacheStage::user_scoped(Arc::new(cache), TIMEOUT);

        Router::new()
            .route(
                "/operations",
                get(move || async move {
                    calls.hit();
                    (status, r#"[{"title":"pay"}]"#)
                }),
            )
            .layer(middleware::from_fn_with_state(stage, super::cache))
            .layer(middleware::from_fn(as_user))
    }

    fn request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn miss_runs_handler_once_and_writes_back() {
        let cache = MemoryCache::default();
        let calls = CallCounter::default();

        let res = app(cache.clone(), calls.clone(), StatusCode::OK)
            .oneshot(request("/operations"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[&X_CACHE], "MISS");
        assert_eq!(body_bytes(res).await, r#"[{"title":"pay"}]"#.as_bytes());
        assert_eq!(calls.count(), 1);

        let key = cache_key(7, "/operations");
        let stored = eventually(Duration::from_secs(1), || cache.value(&key)).await;
        assert_eq!(stored, r#"[{"title":"pay"}]"#.as_bytes());
    }

    #[tokio::test]
    async fn hit_skips_handler_and_returns_stored_bytes() {
        let cache = MemoryCache::default();
        cache.insert(&cache_key(7, "/operations"), b"[1,2,3]");
        let calls = CallCounter::default();

        let res = app(cache, calls.clone(), StatusCode::OK)
            .oneshot(request("/operations"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(res.headers()[&X_CACHE], "HIT");
        assert_eq!(body_bytes(res).await, b"[1,2,3]".as_slice());
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test]
    async fn miss_keeps_handler_headers_and_hit_is_json() {
        let cache = MemoryCache::default();
        let app = app(cache.clone(), CallCounter::default(), StatusCode::OK);

        let miss = app.clone().oneshot(request("/operations")).await.unwrap();
        assert_eq!(miss.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");

        let key = cache_key(7, "/operations");
        eventually(Duration::from_secs(1), || cache.value(&key)).await;

        let hit = app.oneshot(request("/operations")).await.unwrap();
        assert_eq!(hit.headers()[header::CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn second_request_is_served_from_the_warmed_cache() {
        let cache = MemoryCache::default();
        let calls = CallCounter::default();
        let app = app(cache.clone(), calls.clone(), StatusCode::OK);

        let first = app.clone().oneshot(request("/operations")).await.unwrap();
        let first_body = body_bytes(first).await;

        let key = cache_key(7, "/operations");
        eventually(Duration::from_secs(1), || cache.value(&key)).await;

        let second = app.oneshot(request("/operations")).await.unwrap();
        assert_eq!(second.headers()[&X_CACHE], "HIT");
        assert_eq!(body_bytes(second).await, first_body);
        assert_eq!(calls.count(), 1);
    }

    #[tokio::test]
    async fn query_string_is_part_of_the_key() {
        let cache = MemoryCache::default();
        cache.insert(&cache_key(7, "/operations"), b"[]");
        let calls = CallCounter::default();

        let res = app(cache.clone(), calls.clone(), StatusCode::OK)
            .oneshot(request("/operations?page=2"))
            .await
            .unwrap();

        assert_eq!(res.headers()[&X_CACHE], "MISS");
        assert_eq!(calls.count(), 1);

        let key = cache_key(7, "/operations?page=2");
        eventually(Duration::from_secs(1), || cache.value(&key)).await;
    }

    #[tokio::test]
    async fn unavailable_cache_degrades_to_pass_through() {
        for behavior in [StoreBehavior::Fail, StoreBehavior::Delay(Duration::from_millis(300))] {
            let cache = MemoryCache::default().with_behavior(behavior);
            let calls = CallCounter::default();

            let res = app(cache, calls.clone(), StatusCode::OK)
                .oneshot(request("/operations"))
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(body_bytes(res).await, r#"[{"title":"pay"}]"#.as_bytes());
            assert_eq!(calls.count(), 1);
        }
    }

    #[tokio::test]
    async fn failed_responses_are_not_cached() {
        let cache = MemoryCache::default();
        let calls = CallCounter::default();

        let res = app(cache.clone(), calls.clone(), StatusCode::BAD_REQUEST)
            .oneshot(request("/operations"))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn request_without_user_is_never_cached() {
        let cache = MemoryCache::default();
        let calls = CallCounter::default();
        let stage = CacheStage::user_scoped(Arc::new(cache.clone()), TIMEOUT);

        let handler_calls = calls.clone();
        let app = Router::new()
            .route(
                "/operations",
                get(move || async move {
                    handler_calls.hit();
                    "[]"
                }),
            )
            .layer(middleware::from_fn_with_state(stage, super::cache));

        let res = app.oneshot(request("/operations")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(calls.count(), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn custom_functions_see_the_request_path() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::<(String, Bytes)>::new()));
        let sink = seen.clone();

        let from_cache: FromCacheFn = Arc::new(
            |_ctx: RequestContext, _path: String| -> BoxFuture<'static, Result<Bytes, CacheError>> {
                Box::pin(async { Err(CacheError::NotInCache) })
            },
        );
        let to_cache: ToCacheFn = Arc::new(
            move |_ctx: RequestContext,
                  path: String,
                  body: Bytes|
                  -> BoxFuture<'static, Result<(), CacheError>> {
                let sink = sink.clone();
                Box::pin(async move {
                    sink.lock().unwrap().push((path, body));
                    Ok(())
                })
            },
        );

        let app = Router::new()
            .route("/cards", get(|| async { "{}" }))
            .layer(middleware::from_fn_with_state(
                CacheStage::new(from_cache, to_cache),
                super::cache,
            ));

        app.oneshot(request("/cards?limit=5")).await.unwrap();

        let written = eventually(Duration::from_secs(1), || seen.lock().unwrap().first().cloned()).await;
        assert_eq!(written.0, "/cards?limit=5");
        assert_eq!(written.1, Bytes::from_static(b"{}"));
    }
}
