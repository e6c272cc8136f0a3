//! Per-route stage chains.
//!
//! A route lists its stages in the order a request passes through them. The
//! list is checked once, when the router is built, and turned into
//! `from_fn` layers on the route's `MethodRouter`:
//!
//! - `Identify` must come before `Authenticate`
//! - `Authorize` and `Cache` need `Authenticate` before them
//! - `Cache` comes after `Authorize` when a chain has both, otherwise a hit
//!   would be served before the role check
//! - no stage appears twice
//!
//! Stages bound to one method of a path do not affect the other methods, so
//! `GET` and `POST` on the same path may carry different chains (see
//! `MethodRouter::merge`).

use axum::{middleware, routing::MethodRouter};
use thiserror::Error;

use crate::middleware::auth::{Authenticator, RoleGuard, authenticate, authorize, identify};
use crate::middleware::cache::{CacheStage, cache};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Identify,
    Authenticate,
    /// Any of the listed roles grants access.
    Authorize(&'static [&'static str]),
    Cache,
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Identify => "identify",
            Stage::Authenticate => "authenticate",
            Stage::Authorize(_) => "authorize",
            Stage::Cache => "cache",
        }
    }

    fn requires(&self) -> Option<Stage> {
        match self {
            Stage::Identify => None,
            Stage::Authenticate => Some(Stage::Identify),
            Stage::Authorize(_) | Stage::Cache => Some(Stage::Authenticate),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("stage `{0}` appears more than once")]
    Duplicate(&'static str),
    #[error("stage `{stage}` must come after `{requires}`")]
    MissingPrerequisite {
        stage: &'static str,
        requires: &'static str,
    },
    #[error("stage `{stage}` must come before `{before}`")]
    Misordered {
        stage: &'static str,
        before: &'static str,
    },
}

pub fn validate(stages: &[Stage]) -> Result<(), PipelineError> {
    for (i, stage) in stages.iter().enumerate() {
        let before = &stages[..i];

        if before.iter().any(|s| s.name() == stage.name()) {
            return Err(PipelineError::Duplicate(stage.name()));
        }

        if let Some(required) = stage.requires()
            && !before.contains(&required)
        {
            return Err(PipelineError::MissingPrerequisite {
                stage: stage.name(),
                requires: required.name(),
            });
        }

        if matches!(stage, Stage::Authorize(_)) && before.contains(&Stage::Cache) {
            return Err(PipelineError::Misordered {
                stage: stage.name(),
                before: Stage::Cache.name(),
            });
        }
    }

    Ok(())
}

/// Wrap `route` in `stages`, first stage outermost.
pub fn pipeline(
    state: &AppState,
    stages: &[Stage],
    route: MethodRouter<AppState>,
) -> Result<MethodRouter<AppState>, PipelineError> {
    validate(stages)?;

    // Layers added last run first, so fold from the innermost stage out.
    let route = stages.iter().rev().fold(route, |route, stage| match *stage {
        Stage::Identify => route.layer(middleware::from_fn(identify)),
        Stage::Authenticate => route.layer(middleware::from_fn_with_state(
            Authenticator::new(state.tokens.clone(), state.token_lookup_timeout),
            authenticate,
        )),
        Stage::Authorize(roles) => route.layer(middleware::from_fn_with_state(
            RoleGuard::new(state.tokens.clone(), roles),
            authorize,
        )),
        Stage::Cache => route.layer(middleware::from_fn_with_state(
            CacheStage::user_scoped(state.cache.clone(), state.cache_timeout),
            cache,
        )),
    });

    Ok(route)
}
