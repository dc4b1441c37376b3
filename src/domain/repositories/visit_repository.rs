//! Repository trait for visit logs.

use crate::domain::entities::{NewVisitLog, VisitLog};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for recorded visits.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgVisitRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Stores a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, visit: NewVisitLog) -> Result<VisitLog, AppError>;

    /// Counts recorded visits for a short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_short_url(&self, short_url: &str) -> Result<i64, AppError>;

    /// Lists visits made from a client IP, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_client_ip(&self, client_ip: &str) -> Result<Vec<VisitLog>, AppError>;
}
