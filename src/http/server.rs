//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the redirect middleware and a 404 fallback
//! - Wire up middleware (tracing, timeout, request ID)
//! - Apply configuration updates by swapping the engine
//! - Serve until shutdown is signalled

use std::time::Duration;

use axum::{
    http::{HeaderName, StatusCode},
    middleware,
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RedirectConfig;
use crate::http::middleware::{redirect_middleware, EngineState, RedirectState};
use crate::http::request::X_REQUEST_ID;
use crate::lifecycle::ShutdownListener;
use crate::redirect::SiteRootError;

/// Standalone HTTP server that answers with redirects or 404.
pub struct HttpServer {
    router: Router,
    config: RedirectConfig,
    state: RedirectState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RedirectConfig) -> Result<Self, SiteRootError> {
        let state = RedirectState::new(EngineState::from_config(&config)?);
        let router = Self::build_router(&config, state.clone());

        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RedirectConfig, state: RedirectState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .fallback(not_found)
            .layer(middleware::from_fn_with_state(state, redirect_middleware))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(PropagateRequestIdLayer::new(request_id)),
            )
    }

    /// The fully layered router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the live engine state.
    pub fn state(&self) -> RedirectState {
        self.state.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RedirectConfig>,
        shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match EngineState::from_config(&config) {
                    Ok(next) => {
                        state.replace(next);
                        tracing::info!(
                            redirects = config.redirects.len(),
                            debug = config.site.debug,
                            "Redirect configuration reloaded"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected configuration update");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::json;
    use tower::ServiceExt;

    fn config(redirects: Vec<serde_json::Value>) -> RedirectConfig {
        let mut config = RedirectConfig::default();
        config.site.base_url = "https://example.com".into();
        config.redirects = redirects;
        config
    }

    async fn send(router: Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_matching_request_is_redirected() {
        let server = HttpServer::new(config(vec![json!({ "from": "old-page", "to": "new-page" })])).unwrap();

        let response = send(server.router(), "/old-page/").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "https://example.com/new-page");
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_unmatched_request_falls_through() {
        let server = HttpServer::new(config(vec![json!({ "from": "old-page", "to": "new-page" })])).unwrap();

        let response = send(server.router(), "/other").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_self_redirect_falls_through() {
        let server = HttpServer::new(config(vec![json!({ "from": "*", "to": "home", "type": "wildcard" })])).unwrap();

        assert_eq!(send(server.router(), "/home").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(send(server.router(), "/elsewhere").await.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn test_debug_mode_reports_destination() {
        let mut config = config(vec![json!({ "from": "old", "to": "new" })]);
        config.site.debug = true;
        let server = HttpServer::new(config).unwrap();

        let response = send(server.router(), "/old").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Redirect to https://example.com/new");
    }

    #[tokio::test]
    async fn test_configured_status_is_used() {
        let mut config = config(vec![json!({ "from": "old", "to": "new" })]);
        config.site.redirect_status = 308;
        let server = HttpServer::new(config).unwrap();

        let response = send(server.router(), "/old").await;
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    }

    #[tokio::test]
    async fn test_replacing_state_changes_rules() {
        let server = HttpServer::new(config(Vec::new())).unwrap();
        assert_eq!(send(server.router(), "/old").await.status(), StatusCode::NOT_FOUND);

        let updated = config(vec![json!({ "from": "old", "to": "new" })]);
        server.state().replace(EngineState::from_config(&updated).unwrap());

        assert_eq!(send(server.router(), "/old").await.status(), StatusCode::FOUND);
    }

    #[test]
    fn test_invalid_site_url_is_rejected() {
        let mut config = config(Vec::new());
        config.site.base_url = "example.com".into();
        assert!(HttpServer::new(config).is_err());
    }
}
