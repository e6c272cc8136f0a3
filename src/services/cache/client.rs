//! Cache client interface used by the response cache stage.
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors.
///
/// Note:
/// - Kept independent from `AppError`: a cache failure never reaches the
///   caller. Reads degrade to a miss, writes are logged.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("key not found in cache")]
    NotInCache,
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
    // The request context carries no authenticated user, so no per-user key exists.
    #[error("request is not scoped to a user")]
    Unscoped,
}

impl CacheError {
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::NotInCache)
    }
}

/// A minimal byte-value cache (GET / SET / DEL on a string key).
///
/// Shared as `Arc<dyn CacheClient>`; implementations must be safe for
/// concurrent use from many in-flight requests.
#[async_trait]
pub trait CacheClient: Send + Sync + 'static {
    // Returns the cache backend name (for logging/health).
    fn backend_name(&self) -> &'static str;

    // `Ok(None)` when the key does not exist.
    async fn get_bytes(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    // Overwrites any previous value.
    async fn set_bytes(&self, key: &str, value: &[u8]) -> CacheResult<()>;

    // Delete a key. Returns number of deleted keys.
    async fn del(&self, key: &str) -> CacheResult<u64>;
}

/// Bound a single cache operation so a slow backend turns into an error
/// instead of stalling the request.
pub async fn with_timeout<T, F>(timeout: Duration, op: F) -> CacheResult<T>
where
    F: Future<Output = CacheResult<T>>,
{
    tokio::time::timeout(timeout, op)
        .await
        .map_err(|_| CacheError::Timeout(timeout))?
}
