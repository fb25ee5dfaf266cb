//! API route configuration.

use crate::api::handlers::{
    link_stats_handler, shorten_handler, summary_handler, validate_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// JSON API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten`        - Create a short link
/// - `POST /validate`       - Check a URL and/or custom code
/// - `GET  /stats`          - Aggregated statistics
/// - `GET  /stats/{code}`   - Record of a single link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/validate", post(validate_handler))
        .route("/stats", get(summary_handler))
        .route("/stats/{code}", get(link_stats_handler))
}
