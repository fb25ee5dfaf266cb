//! DTOs for the field pre-check endpoint.

use serde::{Deserialize, Serialize};

/// Fields to check without creating anything.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub url: Option<String>,
    pub custom_code: Option<String>,
}

/// Per-field verdicts; only requested fields are present.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<FieldCheck>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_code: Option<FieldCheck>,
}

/// Verdict for a single field.
#[derive(Debug, Serialize)]
pub struct FieldCheck {
    pub valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Canonical form of a valid URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<String>,
}

impl FieldCheck {
    pub fn valid(normalized: Option<String>) -> Self {
        Self {
            valid: true,
            error: None,
            normalized,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            normalized: None,
        }
    }
}
