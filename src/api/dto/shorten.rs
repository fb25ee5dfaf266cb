//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
///
/// Only the description is limited here. `url` and `custom_code` go through
/// the ordered URL and code rules in the link service, which report the
/// failing field.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten.
    pub url: String,

    /// Optional custom short code. Blank means none.
    pub custom_code: Option<String>,

    /// Optional free-text note stored with the link.
    #[validate(length(max = 200, message = "Description must be at most 200 characters"))]
    pub description: Option<String>,
}

impl ShortenRequest {
    /// Trims inputs and drops blank optional fields.
    pub fn normalized(self) -> Self {
        Self {
            url: self.url.trim().to_string(),
            custom_code: non_blank(self.custom_code),
            description: non_blank(self.description),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Successful shortening result.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub success: bool,
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub stats_url: String,
}
