pub mod client;
pub mod valkey;

pub use client::{CacheClient, CacheError, with_timeout};
pub use valkey::ValkeyClient;

/// Cache key for a user's response on `path` (path including query string).
///
/// Every cached response is namespaced by the user id, so two users never
/// share an entry for the same path.
pub fn cache_key(user_id: i64, path: &str) -> String {
    format!("users:{}:{}", user_id, path)
}
