//! Repository trait for short link data access.

use std::collections::HashSet;

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// Codes are unique across the store. [`LinkRepository::insert_if_absent`] is
/// the only place that guarantee is enforced; lookups used before it are
/// advisory.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - Process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Atomically inserts a link unless its code is already taken.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if the link was stored
    /// - `Ok(None)` if another link already owns the code
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<Option<Link>, AppError>;

    /// Finds an active link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds an active link by its normalized long URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, AppError>;

    /// Snapshot of every code currently stored, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn existing_codes(&self) -> Result<HashSet<String>, AppError>;

    /// Whether any link, active or not, holds `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Increments the click counter of a link and stamps `last_accessed`.
    ///
    /// Returns `Ok(false)` if no active link has the code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn record_click(&self, code: &str) -> Result<bool, AppError>;

    /// Lists every active link, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_all(&self) -> Result<Vec<Link>, AppError>;

    /// Counts active links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Sum of click counters over active links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn total_clicks(&self) -> Result<i64, AppError>;
}
