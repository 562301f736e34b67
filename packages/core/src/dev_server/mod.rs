//! Development tag store HTTP server
//!
//! Serves the tag store API over any [`TagStore`] so the client side
//! (resolver, HTTP store, CLI) can be exercised without the real service.
//! The API can be mounted under a path prefix to imitate a gateway that
//! exposes the store under its service name.
//!
//! # Usage
//!
//! ```bash
//! DEV_TAG_STORE_PREFIX=/tag-service cargo run --bin dev-tag-store
//! ```
//!
//! # Security
//!
//! - No authentication (local development only)
//! - Binds to 127.0.0.1

use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::store::TagStore;
use crate::upstream::config::normalize_prefix;

mod http_error;
mod tag_endpoints;

pub use http_error::HttpError;

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TagStore>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the router, optionally nested under `prefix`
pub fn create_router(store: Arc<dyn TagStore>, prefix: Option<&str>) -> Router {
    let state = AppState { store };
    let api = Router::new()
        .route("/health", get(health_check))
        .merge(tag_endpoints::routes(state));

    let prefix = prefix.map(normalize_prefix).unwrap_or_default();
    let app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(&prefix, api)
    };

    app.layer(TraceLayer::new_for_http())
}

/// Serve the API on an already-bound listener
pub async fn serve(
    listener: TcpListener,
    store: Arc<dyn TagStore>,
    prefix: Option<&str>,
) -> anyhow::Result<()> {
    let app = create_router(store, prefix);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the dev tag store on `127.0.0.1:port`
///
/// # Errors
///
/// Returns error if server fails to bind or start.
pub async fn start_server(
    store: Arc<dyn TagStore>,
    port: u16,
    prefix: Option<&str>,
) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(
        "Dev tag store listening on http://{}{}",
        addr,
        prefix.map(normalize_prefix).unwrap_or_default()
    );
    tracing::info!("Development mode only - NOT for production use");

    serve(listener, store, prefix).await
}
