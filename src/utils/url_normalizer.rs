//! URL normalization.
//!
//! Produces the canonical form of a URL that is hashed into a short code and
//! persisted: lower-case host, no default port, everything else preserved.
//!
//! The path, query and fragment are copied from the input as written. They
//! are not re-serialized, so dot segments and percent-encoding are untouched.

use url::Url;

/// Scheme prefixes recognised as already present; anything else gets `http://`.
const KNOWN_SCHEME_PREFIXES: &[&str] = &["http://", "https://", "ftp://", "ftps://"];

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Outcome of [`normalize_url`].
///
/// Normalization never fails outright: when the input cannot be parsed it is
/// returned untouched as [`NormalizedUrl::Unchanged`] so callers can still
/// store or hash it, and can tell that it is not canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedUrl {
    Canonical(String),
    Unchanged(String),
}

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        match self {
            NormalizedUrl::Canonical(url) | NormalizedUrl::Unchanged(url) => url,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            NormalizedUrl::Canonical(url) | NormalizedUrl::Unchanged(url) => url,
        }
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self, NormalizedUrl::Canonical(_))
    }
}

/// Normalizes a URL to its canonical form.
///
/// # Normalization Rules
///
/// 1. **Whitespace**: Leading and trailing whitespace is trimmed
/// 2. **Scheme**: `http://` is prepended unless the URL starts with a known scheme
/// 3. **Hostname**: Converted to lowercase
/// 4. **Default ports**: Removed (80 for HTTP, 443 for HTTPS)
/// 5. **Path, query, fragment**: Preserved
///
/// The function is idempotent: normalizing a normalized URL returns it unchanged.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(
///     normalize_url("HTTPS://EXAMPLE.COM:443/Path#top").as_str(),
///     "https://example.com/Path#top"
/// );
/// assert_eq!(normalize_url("example.com/page").as_str(), "http://example.com/page");
/// ```
pub fn normalize_url(input: &str) -> NormalizedUrl {
    match try_normalize_url(input) {
        Ok(normalized) => NormalizedUrl::Canonical(normalized),
        Err(e) => {
            tracing::debug!("URL left unnormalized: {}", e);
            NormalizedUrl::Unchanged(input.to_string())
        }
    }
}

/// Normalizes a URL, reporting why it could not be normalized.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for empty or unparsable input.
/// Returns [`UrlNormalizationError::NormalizationFailed`] if the authority
/// cannot be located.
pub fn try_normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::InvalidFormat(
            "empty input".to_string(),
        ));
    }

    let candidate = if has_known_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let url =
        Url::parse(&candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    let (_, rest) = candidate.split_once("://").ok_or_else(|| {
        UrlNormalizationError::NormalizationFailed("missing scheme separator".to_string())
    })?;
    let authority_end = rest
        .find(['/', '?', '#', '\\'])
        .unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);

    let authority = authority.to_ascii_lowercase();
    let default_port = match url.scheme() {
        "http" => Some(":80"),
        "https" => Some(":443"),
        _ => None,
    };
    let authority = default_port
        .and_then(|port| authority.strip_suffix(port))
        .unwrap_or(&authority);

    Ok(format!("{}://{}{}", url.scheme(), authority, tail))
}

/// Extracts the lower-cased host of a URL, or `None` if it has none or cannot be parsed.
pub fn domain_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_ascii_lowercase)
}

fn has_known_scheme(url: &str) -> bool {
    KNOWN_SCHEME_PREFIXES.iter().any(|prefix| {
        url.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}
