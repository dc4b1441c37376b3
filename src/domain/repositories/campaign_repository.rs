//! Repository trait for campaign tags.

use crate::domain::entities::{CampaignKind, CampaignTag, CampaignTagPatch, NewCampaignTag};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user-owned campaign tags.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCampaignRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// Creates a tag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the user already has this tag for `kind`.
    async fn create(&self, new_tag: NewCampaignTag) -> Result<CampaignTag, AppError>;

    /// Lists a user's tags of one kind, oldest first.
    async fn list_by_user(
        &self,
        kind: CampaignKind,
        user_id: &str,
    ) -> Result<Vec<CampaignTag>, AppError>;

    /// Applies a partial update. Returns `Ok(None)` if no tag matches.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new tag collides with another one.
    async fn update(
        &self,
        kind: CampaignKind,
        user_id: &str,
        unique_id: &str,
        patch: CampaignTagPatch,
    ) -> Result<Option<CampaignTag>, AppError>;

    /// Deletes a tag. Returns `Ok(false)` if no tag matched.
    async fn delete(
        &self,
        kind: CampaignKind,
        user_id: &str,
        unique_id: &str,
    ) -> Result<bool, AppError>;
}
