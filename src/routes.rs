//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_url}` - Short URL redirect
//! - `GET  /health`      - Health check: DB, cache, visit queue
//! - `GET  /ping`        - Liveness probe
//! - everything in [`crate::api::routes::routes`]
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Panic recovery** - Panics become a 500 error envelope
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, ping_handler, redirect_handler};
use crate::api::middleware::{panic, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/ping", get(ping_handler))
        .route("/{short_url}", get(redirect_handler))
        .merge(api::routes::routes())
        .with_state(state)
        .layer(panic::layer())
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
