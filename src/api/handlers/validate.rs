//! Handler for field pre-checks.

use axum::{Json, extract::State};

use crate::api::dto::validate::{FieldCheck, ValidateRequest, ValidateResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_validator::{CodeError, validate_custom_code};
use crate::utils::url_normalizer::normalize_url;
use crate::utils::url_validator::validate_url;

/// Checks a URL and/or custom code without creating a link.
///
/// # Endpoint
///
/// `POST /api/validate`
///
/// URL strictness follows `STRICT_URL_VALIDATION`. A custom code is checked
/// against the code rules and then for availability.
///
/// # Response
///
/// ```json
/// {
///   "url": { "valid": true, "normalized": "https://example.com" },
///   "custom_code": { "valid": false, "error": "Code 'admin' is reserved" }
/// }
/// ```
pub async fn validate_handler(
    State(state): State<AppState>,
    Json(payload): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, AppError> {
    let url = payload.url.map(|url| {
        let url = url.trim();
        match validate_url(url, state.strict_url_validation) {
            Ok(()) => FieldCheck::valid(Some(normalize_url(url).into_string())),
            Err(e) => FieldCheck::invalid(e.to_string()),
        }
    });

    let custom_code = match payload.custom_code {
        Some(code) => Some(check_code(&state, code.trim()).await?),
        None => None,
    };

    Ok(Json(ValidateResponse { url, custom_code }))
}

async fn check_code(state: &AppState, code: &str) -> Result<FieldCheck, AppError> {
    if let Err(e) = validate_custom_code(code) {
        return Ok(FieldCheck::invalid(e.to_string()));
    }

    if !state.link_service.is_code_available(code).await? {
        return Ok(FieldCheck::invalid(
            CodeError::AlreadyInUse(code.to_string()).to_string(),
        ));
    }

    Ok(FieldCheck::valid(None))
}
