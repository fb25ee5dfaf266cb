//! Short code generation.
//!
//! Codes are derived from a SHA-256 digest of the normalized URL so the same
//! URL always maps to the same code. When that code is taken, random codes are
//! drawn instead, growing one character longer every ten failed attempts.

use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

/// Full alphanumeric alphabet before ambiguous glyphs are filtered out.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Characters that are easy to confuse when a code is read or typed.
pub const AMBIGUOUS_CHARS: &str = "0O1lI";

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default number of random attempts after the hash-based code collides.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Hash-based codes consume one digest byte per character.
pub const MAX_HASH_CODE_LENGTH: usize = 32;

/// Random attempts made at each code length before growing by one.
const ATTEMPTS_PER_LENGTH: usize = 10;

/// Read-only membership query over codes that are already taken.
///
/// Implemented for the standard sets and for any `Fn(&str) -> bool`, so a
/// caller can pass a snapshot set or a custom predicate.
#[cfg_attr(test, mockall::automock)]
pub trait ExistingCodes {
    fn contains_code(&self, code: &str) -> bool;
}

impl<S: BuildHasher> ExistingCodes for HashSet<String, S> {
    fn contains_code(&self, code: &str) -> bool {
        self.contains(code)
    }
}

impl ExistingCodes for BTreeSet<String> {
    fn contains_code(&self, code: &str) -> bool {
        self.contains(code)
    }
}

impl<F: Fn(&str) -> bool> ExistingCodes for F {
    fn contains_code(&self, code: &str) -> bool {
        self(code)
    }
}

/// How a generated code was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeOrigin {
    Hash,
    Random,
}

/// A code that was free in the supplied existing-codes snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub code: String,
    pub origin: CodeOrigin,
}

/// Every candidate within the attempt budget was already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("No free code found after {attempts} attempts")]
pub struct ExhaustedError {
    pub attempts: usize,
}

/// Invalid generator settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorConfigError {
    #[error("Alphabet has no characters left after removing ambiguous ones")]
    EmptyAlphabet,

    #[error("Code length must be between 1 and 32, got {0}")]
    InvalidLength(usize),

    #[error("Max attempts must be at least 1")]
    ZeroAttempts,
}

/// Short code generator configuration.
///
/// Immutable once built; share it by reference between concurrent callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeGenerator {
    alphabet: Vec<char>,
    length: usize,
    max_attempts: usize,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: filter_alphabet(DEFAULT_ALPHABET),
            length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl CodeGenerator {
    /// Creates a generator.
    ///
    /// Ambiguous characters ([`AMBIGUOUS_CHARS`]) and duplicates are removed
    /// from `alphabet`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorConfigError`] if the filtered alphabet is empty,
    /// `length` is outside `1..=MAX_HASH_CODE_LENGTH` or `max_attempts` is 0.
    pub fn new(
        alphabet: &str,
        length: usize,
        max_attempts: usize,
    ) -> Result<Self, GeneratorConfigError> {
        let alphabet = filter_alphabet(alphabet);
        if alphabet.is_empty() {
            return Err(GeneratorConfigError::EmptyAlphabet);
        }
        if length == 0 || length > MAX_HASH_CODE_LENGTH {
            return Err(GeneratorConfigError::InvalidLength(length));
        }
        if max_attempts == 0 {
            return Err(GeneratorConfigError::ZeroAttempts);
        }

        Ok(Self {
            alphabet,
            length,
            max_attempts,
        })
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Draws a code uniformly at random (with replacement) from the alphabet.
    ///
    /// Uses the configured length when `length` is `None`.
    pub fn random_code(&self, length: Option<usize>) -> String {
        self.random_code_with(&mut rand::rng(), length.unwrap_or(self.length))
    }

    fn random_code_with<R: Rng + ?Sized>(&self, rng: &mut R, length: usize) -> String {
        (0..length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }

    /// Derives a deterministic code from a normalized URL.
    ///
    /// Each character comes from one byte (one hex pair) of the URL's SHA-256
    /// digest: `alphabet[byte % alphabet.len()]`. Lengths above
    /// [`MAX_HASH_CODE_LENGTH`] are capped.
    pub fn hash_code(&self, normalized_url: &str, length: Option<usize>) -> String {
        let length = length.unwrap_or(self.length).min(MAX_HASH_CODE_LENGTH);
        let digest = Sha256::digest(normalized_url.as_bytes());

        digest
            .iter()
            .take(length)
            .map(|&byte| self.alphabet[usize::from(byte) % self.alphabet.len()])
            .collect()
    }

    /// Finds a code that is not in `existing`.
    ///
    /// Tries the hash-based code first. On collision, makes up to
    /// `max_attempts` (default: configured) random draws, where attempt `i`
    /// uses length `length + i / 10`.
    ///
    /// `existing` is a snapshot and may be stale; the store must still enforce
    /// uniqueness when the code is inserted.
    ///
    /// # Errors
    ///
    /// Returns [`ExhaustedError`] if every candidate collides.
    pub fn unique_code<E: ExistingCodes + ?Sized>(
        &self,
        normalized_url: &str,
        existing: &E,
        max_attempts: Option<usize>,
    ) -> Result<GeneratedCode, ExhaustedError> {
        let hash_code = self.hash_code(normalized_url, None);
        if !existing.contains_code(&hash_code) {
            return Ok(GeneratedCode {
                code: hash_code,
                origin: CodeOrigin::Hash,
            });
        }

        tracing::debug!("Hash code {} taken, falling back to random codes", hash_code);

        let attempts = max_attempts.unwrap_or(self.max_attempts);
        let mut rng = rand::rng();

        for attempt in 0..attempts {
            let length = self.length + attempt / ATTEMPTS_PER_LENGTH;
            let candidate = self.random_code_with(&mut rng, length);

            if !existing.contains_code(&candidate) {
                return Ok(GeneratedCode {
                    code: candidate,
                    origin: CodeOrigin::Random,
                });
            }
        }

        Err(ExhaustedError { attempts })
    }
}

fn filter_alphabet(alphabet: &str) -> Vec<char> {
    let mut filtered: Vec<char> = Vec::with_capacity(alphabet.len());
    for c in alphabet.chars() {
        if !AMBIGUOUS_CHARS.contains(c) && !filtered.contains(&c) {
            filtered.push(c);
        }
    }
    filtered
}
