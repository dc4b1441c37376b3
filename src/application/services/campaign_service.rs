//! Campaign tag management.

use std::sync::Arc;

use rand::Rng;
use serde_json::json;

use crate::domain::entities::{CampaignKind, CampaignTag, CampaignTagPatch, NewCampaignTag};
use crate::domain::repositories::CampaignRepository;
use crate::error::AppError;

const UNIQUE_ID_LENGTH: usize = 6;
const UNIQUE_ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_CREATE_ATTEMPTS: usize = 5;

/// CRUD over a user's campaign source, medium and name tags.
pub struct CampaignService {
    campaigns: Arc<dyn CampaignRepository>,
}

impl CampaignService {
    pub fn new(campaigns: Arc<dyn CampaignRepository>) -> Self {
        Self { campaigns }
    }

    /// Creates a tag with a fresh 6-character `unique_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the user already has `tag` for `kind`.
    pub async fn create(
        &self,
        kind: CampaignKind,
        user_id: String,
        tag: String,
        name: String,
    ) -> Result<CampaignTag, AppError> {
        let mut last_err = None;

        for _ in 0..MAX_CREATE_ATTEMPTS {
            let new_tag = NewCampaignTag {
                unique_id: generate_unique_id(),
                user_id: user_id.clone(),
                kind,
                tag: tag.clone(),
                name: name.clone(),
            };

            match self.campaigns.create(new_tag).await {
                Ok(created) => return Ok(created),
                Err(AppError::Conflict { context, .. })
                    if context["constraint"] == "campaign_tags_unique_id_key" =>
                {
                    last_err = Some(AppError::internal(
                        "Failed to generate unique id",
                        context,
                    ));
                }
                Err(AppError::Conflict { .. }) => {
                    return Err(AppError::conflict(
                        format!("Campaign {kind} tag already exists"),
                        json!({ "user_id": user_id, "tag": tag }),
                    ));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            AppError::internal("Failed to generate unique id", json!({}))
        }))
    }

    pub async fn list(&self, kind: CampaignKind, user_id: &str) -> Result<Vec<CampaignTag>, AppError> {
        self.campaigns.list_by_user(kind, user_id).await
    }

    /// Applies the provided fields of `patch`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the patch is empty
    /// - [`AppError::NotFound`] if no tag matches
    /// - [`AppError::Conflict`] if the new `tag` collides with another one
    pub async fn update(
        &self,
        kind: CampaignKind,
        user_id: &str,
        unique_id: &str,
        patch: CampaignTagPatch,
    ) -> Result<CampaignTag, AppError> {
        if patch.is_empty() {
            return Err(AppError::bad_request(
                "Nothing to update",
                json!({ "fields": ["tag", "name"] }),
            ));
        }

        self.campaigns
            .update(kind, user_id, unique_id, patch)
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => AppError::conflict(
                    format!("Campaign {kind} tag already exists"),
                    json!({ "user_id": user_id, "unique_id": unique_id }),
                ),
                other => other,
            })?
            .ok_or_else(|| no_match(kind, user_id, unique_id))
    }

    pub async fn delete(
        &self,
        kind: CampaignKind,
        user_id: &str,
        unique_id: &str,
    ) -> Result<(), AppError> {
        if self.campaigns.delete(kind, user_id, unique_id).await? {
            Ok(())
        } else {
            Err(no_match(kind, user_id, unique_id))
        }
    }
}

fn no_match(kind: CampaignKind, user_id: &str, unique_id: &str) -> AppError {
    AppError::not_found(
        "No matching record found",
        json!({ "kind": kind.as_str(), "user_id": user_id, "unique_id": unique_id }),
    )
}

fn generate_unique_id() -> String {
    let mut rng = rand::rng();
    (0..UNIQUE_ID_LENGTH)
        .map(|_| char::from(UNIQUE_ID_CHARSET[rng.random_range(0..UNIQUE_ID_CHARSET.len())]))
        .collect()
}
