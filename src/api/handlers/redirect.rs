//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};
use url::Url;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}` and `GET /r/{code}`
///
/// # Click Tracking
///
/// Click events are sent to a bounded channel for async processing.
/// If the queue is full, the click is dropped (fire-and-forget).
///
/// # Errors
///
/// Returns 404 Not Found if no active link has the code.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.resolve(&code).await?;

    match state.click_sender.try_send(ClickEvent::new(link.code)) {
        Ok(()) => {}
        Err(TrySendError::Full(ev)) => warn!("Click queue full, dropping click for {}", ev.code),
        Err(TrySendError::Closed(ev)) => warn!("Click queue closed, dropping click for {}", ev.code),
    }

    debug!("Redirecting {} -> {}", code, link.long_url);

    let location = location_header(&link.long_url)?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]))
}

/// Stored URLs keep their original spelling; characters a header cannot
/// carry are percent-encoded for the `Location` value only.
fn location_header(long_url: &str) -> Result<HeaderValue, AppError> {
    if let Ok(value) = HeaderValue::from_str(long_url) {
        return Ok(value);
    }

    Url::parse(long_url)
        .ok()
        .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
        .ok_or_else(|| {
            AppError::internal(
                "Stored URL cannot be used as a redirect target",
                json!({ "url": long_url }),
            )
        })
}
