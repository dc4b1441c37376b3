//! DTOs for campaign tag endpoints.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{CampaignKind, CampaignTag, CampaignTagPatch};
use crate::utils::display_time::format_display;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 128, message = "user_id must be 1-128 characters"))]
    pub user_id: String,

    #[validate(length(min = 1, max = 100, message = "tag must be 1-100 characters"))]
    pub tag: String,

    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
}

/// Partial update; omitted fields keep their value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 1, max = 100, message = "tag must be 1-100 characters"))]
    pub tag: Option<String>,

    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,
}

impl From<UpdateCampaignRequest> for CampaignTagPatch {
    fn from(req: UpdateCampaignRequest) -> Self {
        Self {
            tag: req.tag,
            name: req.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CampaignResponse {
    pub unique_id: String,
    pub user_id: String,
    pub kind: CampaignKind,
    pub tag: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl CampaignResponse {
    pub fn from_tag(tag: CampaignTag, offset: FixedOffset) -> Self {
        Self {
            created_at: format_display(tag.created_at, offset),
            updated_at: format_display(tag.updated_at, offset),
            unique_id: tag.unique_id,
            user_id: tag.user_id,
            kind: tag.kind,
            tag: tag.tag,
            name: tag.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CampaignDeleted {
    pub message: String,
    pub unique_id: String,
}
