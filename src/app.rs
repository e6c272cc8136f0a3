/*
 * Responsibility
 * - tracing + panic hook setup
 * - Config → dependencies (PgPool, Valkey, token store) → AppState
 * - Router assembly (routes + HTTP-level layers) and axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::{cache::ValkeyClient, security::PgTokenStore};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,card_service=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting card service in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config)?;

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .connect(&config.database_url)
        .await
        .context("failed to connect to postgres")?;

    let cache = ValkeyClient::new(&config.cache_url, config.cache_ttl)
        .await
        .context("failed to connect to valkey")?;
    tracing::info!(ttl = ?config.cache_ttl, "response cache ready");

    let tokens = PgTokenStore::new(db.clone());

    Ok(AppState::new(
        db,
        Arc::new(tokens),
        Arc::new(cache),
        config.token_lookup_timeout,
        config.cache_timeout,
    ))
}

fn build_router(state: AppState, config: &Config) -> Result<Router> {
    let router = api::routes(state).context("invalid route table")?;
    Ok(middleware::http::apply(router, config))
}
