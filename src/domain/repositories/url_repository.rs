//! Repository trait for shortened URL records.

use crate::domain::entities::{NewShortenedUrl, ShortenedUrl};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for shortened URL records.
///
/// Every mutation is committed before the call returns, so callers can rely on
/// a delete being durable before they invalidate the cache.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds the record for a code within a domain.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code_and_domain(
        &self,
        code: &str,
        domain: &str,
    ) -> Result<Option<ShortenedUrl>, AppError>;

    /// Finds a record by code alone, ignoring the domain.
    ///
    /// When the same code exists under several domains the most recently
    /// created record is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_short_code(&self, code: &str) -> Result<Option<ShortenedUrl>, AppError>;

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `(short_url, custom_domain)` is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_url: NewShortenedUrl) -> Result<ShortenedUrl, AppError>;

    /// Persists `click_count` and `updated_at` of `record` if the stored
    /// click count still equals `expected_click_count`.
    ///
    /// Returns `Ok(false)` when another writer got there first or the record
    /// no longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(
        &self,
        record: &ShortenedUrl,
        expected_click_count: i64,
    ) -> Result<bool, AppError>;

    /// Deletes a record by id. Deleting a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, record: &ShortenedUrl) -> Result<(), AppError>;

    /// Deletes every record that is no longer live at `now` and returns the
    /// deleted codes so their cache entries can be invalidated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be queried.
    async fn ping(&self) -> Result<(), AppError>;
}
