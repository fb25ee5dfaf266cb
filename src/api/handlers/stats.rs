//! Handlers for link statistics.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;

use crate::api::dto::stats::{LinkStatsResponse, SummaryQuery, SummaryResponse};
use crate::application::services::stats_service::DEFAULT_STATS_DAYS;
use crate::error::AppError;
use crate::state::AppState;

const MAX_STATS_DAYS: i64 = 365;

/// Retrieves the record of a single short link.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn link_stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<LinkStatsResponse>, AppError> {
    let link = state.stats_service.link_stats(&code).await?;
    Ok(Json(link.into()))
}

/// Aggregated statistics over all links.
///
/// # Endpoint
///
/// `GET /api/stats?days=30`
///
/// # Query Parameters
///
/// - `days` (optional): Window of the daily creation histogram (default: 30, max: 365)
///
/// # Errors
///
/// Returns 400 Bad Request if `days` is out of range.
pub async fn summary_handler(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_STATS_DAYS);
    if !(1..=MAX_STATS_DAYS).contains(&days) {
        return Err(AppError::bad_request(
            format!("days must be between 1 and {MAX_STATS_DAYS}"),
            json!({ "field": "days" }),
        ));
    }

    let summary = state.stats_service.summary(days).await?;
    Ok(Json(SummaryResponse::new(summary, days)))
}
