//! Public base URL derived from HTTP request headers.

use crate::AppError;
use axum::http::{HeaderMap, header};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Extracts the authority (host and optional port) from the `Host` header.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the header is missing, empty or not
/// valid UTF-8.
pub fn extract_host_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    let host = headers
        .get(header::HOST)
        .ok_or_else(|| AppError::bad_request("Missing Host header", serde_json::json!({})))?
        .to_str()
        .map_err(|_| AppError::bad_request("Invalid Host header", serde_json::json!({})))?
        .trim();

    if host.is_empty() {
        return Err(AppError::bad_request(
            "Invalid Host header",
            serde_json::json!({}),
        ));
    }

    Ok(host.to_ascii_lowercase())
}

/// Builds the base URL short links are served from.
///
/// The scheme comes from `X-Forwarded-Proto` when a proxy sets it to
/// `https`, and defaults to `http`. The port in `Host` is kept.
///
/// # Errors
///
/// See [`extract_host_from_headers`].
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "s.example.com:8080".parse().unwrap());
///
/// let base = base_url_from_headers(&headers).unwrap();
/// assert_eq!(base, "http://s.example.com:8080");
/// ```
pub fn base_url_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    let host = extract_host_from_headers(headers)?;

    let scheme = match headers.get(FORWARDED_PROTO).and_then(|v| v.to_str().ok()) {
        Some(proto) if proto.trim().eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };

    Ok(format!("{scheme}://{host}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};

    #[test]
    fn test_extract_host_simple() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("example.com"));

        let result = extract_host_from_headers(&headers);
        assert_eq!(result.unwrap(), "example.com");
    }

    #[test]
    fn test_extract_host_keeps_port() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("Example.com:3000"));

        let result = extract_host_from_headers(&headers);
        assert_eq!(result.unwrap(), "example.com:3000");
    }

    #[test]
    fn test_extract_host_ipv6_with_port() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("[::1]:8080"));

        let result = extract_host_from_headers(&headers);
        assert_eq!(result.unwrap(), "[::1]:8080");
    }

    #[test]
    fn test_extract_host_missing_header() {
        let headers = HeaderMap::new();

        let result = extract_host_from_headers(&headers);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_extract_host_empty_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static(""));

        assert!(extract_host_from_headers(&headers).is_err());
    }

    #[test]
    fn test_extract_host_invalid_utf8() {
        let mut headers = HeaderMap::new();
        let invalid_bytes = vec![0xFF, 0xFE, 0xFD];
        if let Ok(header_value) = HeaderValue::from_bytes(&invalid_bytes) {
            headers.insert(header::HOST, header_value);

            let result = extract_host_from_headers(&headers);
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_base_url_defaults_to_http() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3000"));

        assert_eq!(
            base_url_from_headers(&headers).unwrap(),
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_base_url_forwarded_https() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("s.example.com"));
        headers.insert(FORWARDED_PROTO, HeaderValue::from_static("https"));

        assert_eq!(
            base_url_from_headers(&headers).unwrap(),
            "https://s.example.com"
        );
    }
}
