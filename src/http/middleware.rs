//! Redirect middleware.
//!
//! Layer it in front of any axum router with
//! `axum::middleware::from_fn_with_state(state, redirect_middleware)`.
//! Requests that produce no redirect reach the inner service untouched.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::config::RedirectConfig;
use crate::http::response::outcome_response;
use crate::redirect::{RedirectEngine, RequestContext, SiteRootError};

/// Engine plus the response settings that travel with it.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub engine: RedirectEngine,
    pub status: StatusCode,
}

impl EngineState {
    pub fn new(engine: RedirectEngine, status: StatusCode) -> Self {
        Self { engine, status }
    }

    pub fn from_config(config: &RedirectConfig) -> Result<Self, SiteRootError> {
        // Validation already restricts the status to redirect codes
        let status = StatusCode::from_u16(config.site.redirect_status).unwrap_or(StatusCode::FOUND);
        Ok(Self::new(config.engine()?, status))
    }
}

/// Shared, atomically replaceable engine state.
#[derive(Clone)]
pub struct RedirectState {
    inner: Arc<ArcSwap<EngineState>>,
}

impl RedirectState {
    pub fn new(state: EngineState) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(state)),
        }
    }

    /// Snapshot used for one request.
    pub fn current(&self) -> Arc<EngineState> {
        self.inner.load_full()
    }

    /// Replace the engine; in-flight requests keep their snapshot.
    pub fn replace(&self, state: EngineState) {
        self.inner.store(Arc::new(state));
    }
}

pub async fn redirect_middleware(
    State(state): State<RedirectState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let current = state.current();
    let context = RequestContext::from(req.uri());
    let outcome = current.engine.evaluate(&context);

    match outcome_response(&outcome, current.status) {
        Some(response) => response,
        None => next.run(req).await,
    }
}
