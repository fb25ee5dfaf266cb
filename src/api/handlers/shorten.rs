//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::HeaderMap, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::base_url::base_url_from_headers;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/page",
///   "custom_code": "my-link",      // optional
///   "description": "Landing page"  // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "success": true,
///   "short_code": "my-link",
///   "short_url": "https://s.example.com/my-link",
///   "original_url": "https://example.com/some/page",
///   "stats_url": "https://s.example.com/api/stats/my-link"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if the URL or custom code breaks a rule
/// - 409 Conflict if the custom code is already in use
/// - 503 Service Unavailable if no free code could be generated
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let base_url = resolve_base_url(&state, &headers)?;

    let link = state
        .link_service
        .shorten(
            &payload.url,
            payload.custom_code.as_deref(),
            payload.description,
        )
        .await?;

    let short_url = state.link_service.short_url(&base_url, &link.code);
    let stats_url = format!("{}/api/stats/{}", base_url.trim_end_matches('/'), link.code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            success: true,
            short_code: link.code,
            short_url,
            original_url: link.long_url,
            stats_url,
        }),
    ))
}

/// Configured base URL, or one derived from the request.
pub(crate) fn resolve_base_url(state: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    match &state.base_url {
        Some(base_url) => Ok(base_url.clone()),
        None => base_url_from_headers(headers),
    }
}
