//! Handlers for campaign tag CRUD.

use axum::extract::{Path, State};
use serde_json::json;

use crate::api::dto::campaign::{
    CampaignDeleted, CampaignResponse, CreateCampaignRequest, UpdateCampaignRequest,
};
use crate::api::dto::envelope::Envelope;
use crate::api::extract::ValidJson;
use crate::domain::entities::CampaignKind;
use crate::error::AppError;
use crate::state::AppState;

fn parse_kind(kind: &str) -> Result<CampaignKind, AppError> {
    kind.parse().map_err(|_| {
        AppError::not_found(
            "Unknown campaign kind",
            json!({ "kind": kind, "expected": ["source", "medium", "name"] }),
        )
    })
}

/// `POST /campaign/{kind}`
pub async fn create_campaign_handler(
    Path(kind): Path<String>,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateCampaignRequest>,
) -> Result<Envelope<CampaignResponse>, AppError> {
    let kind = parse_kind(&kind)?;

    let tag = state
        .campaigns
        .create(kind, payload.user_id, payload.tag, payload.name)
        .await?;

    Ok(Envelope::ok(CampaignResponse::from_tag(
        tag,
        state.settings.display_offset,
    )))
}

/// `GET /campaign/{kind}/{user_id}`
pub async fn list_campaigns_handler(
    Path((kind, user_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Envelope<Vec<CampaignResponse>>, AppError> {
    let kind = parse_kind(&kind)?;
    let offset = state.settings.display_offset;

    let tags = state
        .campaigns
        .list(kind, &user_id)
        .await?
        .into_iter()
        .map(|tag| CampaignResponse::from_tag(tag, offset))
        .collect();

    Ok(Envelope::ok(tags))
}

/// `PUT /campaign/{kind}/{user_id}/{unique_id}`
pub async fn update_campaign_handler(
    Path((kind, user_id, unique_id)): Path<(String, String, String)>,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<UpdateCampaignRequest>,
) -> Result<Envelope<CampaignResponse>, AppError> {
    let kind = parse_kind(&kind)?;

    let tag = state
        .campaigns
        .update(kind, &user_id, &unique_id, payload.into())
        .await?;

    Ok(Envelope::ok(CampaignResponse::from_tag(
        tag,
        state.settings.display_offset,
    )))
}

/// `DELETE /campaign/{kind}/{user_id}/{unique_id}`
pub async fn delete_campaign_handler(
    Path((kind, user_id, unique_id)): Path<(String, String, String)>,
    State(state): State<AppState>,
) -> Result<Envelope<CampaignDeleted>, AppError> {
    let kind = parse_kind(&kind)?;

    state.campaigns.delete(kind, &user_id, &unique_id).await?;

    Ok(Envelope::ok(CampaignDeleted {
        message: "Deleted successfully".to_string(),
        unique_id,
    }))
}
