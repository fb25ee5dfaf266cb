//! Validation rules for user-supplied custom short codes.
//!
//! System-generated codes never pass through here: they are drawn from a
//! filtered alphabet and are only checked for collisions.

use regex::Regex;
use std::sync::LazyLock;

/// Default minimum length of a custom code.
pub const MIN_CODE_LENGTH: usize = 3;

/// Default maximum length of a custom code.
pub const MAX_CODE_LENGTH: usize = 20;

/// Longest run of one repeated character a custom code may contain.
const MAX_REPEATED_RUN: usize = 3;

static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Words that cannot be used as custom codes, compared case-insensitively.
///
/// Covers routes served by the application, common site paths, asset
/// directories and a small profanity list.
pub const RESERVED_WORDS: &[&str] = &[
    "api", "admin", "www", "mail", "ftp", "blog", "shop", "login", "register", "signup", "signin",
    "logout", "dashboard", "profile", "settings", "config", "about", "contact", "help", "support",
    "terms", "privacy", "index", "home", "main", "root", "null", "undefined", "test", "demo",
    "sample", "example", "css", "js", "img", "images", "static", "assets", "health", "stats",
    "fuck", "shit", "damn", "porn", "sex",
];

/// Whether a code failure is about its shape or about its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeErrorKind {
    Format,
    Policy,
}

/// Reasons a custom code is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("Code cannot be empty")]
    Empty,

    #[error("Code must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Code must be at most {max} characters")]
    TooLong { max: usize },

    #[error("Code can only contain letters, digits, hyphens (-) and underscores (_)")]
    InvalidCharacters,

    #[error("Code cannot start with a digit")]
    LeadingDigit,

    #[error("'{0}' is a reserved word")]
    Reserved(String),

    #[error("Code cannot contain the same character more than 3 times in a row")]
    RepeatedCharacters,

    #[error("Code '{0}' is already in use")]
    AlreadyInUse(String),
}

impl CodeError {
    pub fn kind(&self) -> CodeErrorKind {
        match self {
            CodeError::Reserved(_) | CodeError::AlreadyInUse(_) => CodeErrorKind::Policy,
            _ => CodeErrorKind::Format,
        }
    }
}

/// Validates a custom code with the default length bounds
/// ([`MIN_CODE_LENGTH`]..=[`MAX_CODE_LENGTH`]).
///
/// # Errors
///
/// See [`validate_custom_code_with_bounds`].
pub fn validate_custom_code(code: &str) -> Result<(), CodeError> {
    validate_custom_code_with_bounds(code, MIN_CODE_LENGTH, MAX_CODE_LENGTH)
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Non-empty
/// - Length: `min_length..=max_length` characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
/// - Cannot start with a digit
/// - Cannot be a reserved word (case-insensitive)
/// - Cannot repeat the same character 4 or more times in a row
///
/// # Errors
///
/// Returns the [`CodeError`] of the first rule that fails.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_custom_code("my-link").is_ok());
/// assert_eq!(validate_custom_code("ADMIN"), Err(CodeError::Reserved("ADMIN".into())));
/// assert_eq!(validate_custom_code("2fast"), Err(CodeError::LeadingDigit));
/// ```
pub fn validate_custom_code_with_bounds(
    code: &str,
    min_length: usize,
    max_length: usize,
) -> Result<(), CodeError> {
    if code.is_empty() {
        return Err(CodeError::Empty);
    }

    let length = code.chars().count();
    if length < min_length {
        return Err(CodeError::TooShort { min: min_length });
    }
    if length > max_length {
        return Err(CodeError::TooLong { max: max_length });
    }

    if !CUSTOM_CODE_REGEX.is_match(code) {
        return Err(CodeError::InvalidCharacters);
    }

    if code.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(CodeError::LeadingDigit);
    }

    if is_reserved(code) {
        return Err(CodeError::Reserved(code.to_string()));
    }

    if longest_run(code) > MAX_REPEATED_RUN {
        return Err(CodeError::RepeatedCharacters);
    }

    Ok(())
}

/// Returns `true` if `code` is a reserved word, ignoring case.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(code))
}

/// Length of the longest run of one repeated character.
fn longest_run(code: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;

    for c in code.chars() {
        current = if previous == Some(c) { current + 1 } else { 1 };
        longest = longest.max(current);
        previous = Some(c);
    }

    longest
}
