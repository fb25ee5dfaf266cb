//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`, `/r/{code}` - Short link redirect
//! - `GET  /health`              - Health check: store, click queue
//! - `/api/*`                    - JSON API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// Routes and tracing without path normalization.
///
/// Static segments (`/health`, `/api/...`) take precedence over `/{code}`;
/// the reserved word list keeps custom codes from shadowing them.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .route("/r/{code}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer())
}
