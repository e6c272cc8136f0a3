/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 *   - db: PgPool, tokens: token store, cache: response cache client
 * - Clone is cheap (pool + Arcs)
 */
use std::{fmt, sync::Arc, time::Duration};

use sqlx::PgPool;

use crate::services::cache::CacheClient;
use crate::services::security::TokenStore;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: Arc<dyn TokenStore>,
    pub cache: Arc<dyn CacheClient>,
    pub token_lookup_timeout: Duration,
    pub cache_timeout: Duration,
}

impl AppState {
    pub fn new(
        db: PgPool,
        tokens: Arc<dyn TokenStore>,
        cache: Arc<dyn CacheClient>,
        token_lookup_timeout: Duration,
        cache_timeout: Duration,
    ) -> Self {
        Self {
            db,
            tokens,
            cache,
            token_lookup_timeout,
            cache_timeout,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("cache", &self.cache.backend_name())
            .field("token_lookup_timeout", &self.token_lookup_timeout)
            .field("cache_timeout", &self.cache_timeout)
            .finish_non_exhaustive()
    }
}
