//! Short URL creation rules.
//!
//! [`create_short_url`] is the single decision point for turning a submitted
//! URL and optional custom code into a short code. It performs no I/O: taken
//! codes come from a caller-supplied snapshot, and the caller's store has the
//! final say on uniqueness when the code is inserted.

use crate::utils::code_generator::{CodeGenerator, CodeOrigin, ExistingCodes};
use crate::utils::code_validator::{CodeError, CodeErrorKind, validate_custom_code};
use crate::utils::url_normalizer::normalize_url;
use crate::utils::url_validator::{UrlError, UrlErrorKind, validate_url};

/// Why a short URL could not be created.
///
/// Variants separate URL problems from code problems so a form can highlight
/// the right field (see [`ShortenError::field`]).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortenError {
    #[error("URL error: {0}")]
    UrlFormat(UrlError),

    #[error("URL error: {0}")]
    UrlPolicy(UrlError),

    #[error("Code error: {0}")]
    CodeFormat(CodeError),

    #[error("Code error: {0}")]
    CodePolicy(CodeError),

    #[error("Could not generate a unique code after {attempts} attempts, please try again")]
    GenerationExhausted { attempts: usize },
}

impl ShortenError {
    /// Request field the error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ShortenError::UrlFormat(_) | ShortenError::UrlPolicy(_) => Some("url"),
            ShortenError::CodeFormat(_) | ShortenError::CodePolicy(_) => Some("custom_code"),
            ShortenError::GenerationExhausted { .. } => None,
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ShortenError::GenerationExhausted { .. })
    }
}

impl From<UrlError> for ShortenError {
    fn from(err: UrlError) -> Self {
        match err.kind() {
            UrlErrorKind::Format => ShortenError::UrlFormat(err),
            UrlErrorKind::Policy => ShortenError::UrlPolicy(err),
        }
    }
}

impl From<CodeError> for ShortenError {
    fn from(err: CodeError) -> Self {
        match err.kind() {
            CodeErrorKind::Format => ShortenError::CodeFormat(err),
            CodeErrorKind::Policy => ShortenError::CodePolicy(err),
        }
    }
}

/// Where an accepted short code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Derived from the URL digest.
    Hash,
    /// Randomly drawn after the hash-based code collided.
    Random,
    /// Chosen by the user.
    Custom,
}

impl From<CodeOrigin> for Provenance {
    fn from(origin: CodeOrigin) -> Self {
        match origin {
            CodeOrigin::Hash => Provenance::Hash,
            CodeOrigin::Random => Provenance::Random,
        }
    }
}

/// An accepted short code and the canonical URL it should map to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub code: String,
    pub normalized_url: String,
    pub provenance: Provenance,
}

/// Validates a URL and picks its short code.
///
/// # Flow
///
/// 1. Validate `original_url` in strict mode
/// 2. Normalize it
/// 3. With a custom code: validate it and reject it if `existing` contains it
/// 4. Without one: hash-based code, falling back to random codes on collision
///
/// An empty custom code is treated as absent.
///
/// # Concurrency
///
/// `existing` may be stale. Two callers working from the same snapshot can
/// pick the same code, so the store must insert atomically and the whole call
/// must be repeated with a fresh snapshot when the insert reports a conflict.
///
/// # Errors
///
/// Returns the first [`ShortenError`] encountered; no code is returned on failure.
///
/// # Examples
///
/// ```ignore
/// let generator = CodeGenerator::default();
/// let existing = HashSet::new();
/// let shortened = create_short_url(&generator, "https://example.com/x", None, &existing)?;
/// assert_eq!(shortened.provenance, Provenance::Hash);
/// ```
pub fn create_short_url<E: ExistingCodes + ?Sized>(
    generator: &CodeGenerator,
    original_url: &str,
    custom_code: Option<&str>,
    existing: &E,
) -> Result<Shortened, ShortenError> {
    validate_url(original_url, true)?;

    let normalized_url = normalize_url(original_url).into_string();

    if let Some(custom) = custom_code.filter(|c| !c.is_empty()) {
        validate_custom_code(custom)?;

        if existing.contains_code(custom) {
            return Err(CodeError::AlreadyInUse(custom.to_string()).into());
        }

        return Ok(Shortened {
            code: custom.to_string(),
            normalized_url,
            provenance: Provenance::Custom,
        });
    }

    let generated = generator
        .unique_code(&normalized_url, existing, None)
        .map_err(|e| {
            tracing::warn!(
                "Code generation exhausted for {} after {} attempts",
                normalized_url,
                e.attempts
            );
            ShortenError::GenerationExhausted {
                attempts: e.attempts,
            }
        })?;

    Ok(Shortened {
        code: generated.code,
        normalized_url,
        provenance: generated.origin.into(),
    })
}
