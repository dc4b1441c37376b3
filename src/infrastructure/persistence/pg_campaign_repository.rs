//! PostgreSQL implementation of the campaign tag repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{CampaignKind, CampaignTag, CampaignTagPatch, NewCampaignTag};
use crate::domain::repositories::CampaignRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct CampaignRow {
    id: i64,
    unique_id: String,
    user_id: String,
    kind: String,
    tag: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CampaignRow> for CampaignTag {
    type Error = AppError;

    fn try_from(r: CampaignRow) -> Result<Self, Self::Error> {
        let kind = r
            .kind
            .parse::<CampaignKind>()
            .map_err(|e| AppError::internal("Corrupt campaign row", json!({ "cause": e })))?;

        Ok(Self {
            id: r.id,
            unique_id: r.unique_id,
            user_id: r.user_id,
            kind,
            tag: r.tag,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

const COLUMNS: &str = "id, unique_id, user_id, kind, tag, name, created_at, updated_at";

/// PostgreSQL repository for campaign tags.
pub struct PgCampaignRepository {
    pool: Arc<PgPool>,
}

impl PgCampaignRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampaignRepository for PgCampaignRepository {
    async fn create(&self, new_tag: NewCampaignTag) -> Result<CampaignTag, AppError> {
        let row = sqlx::query_as::<_, CampaignRow>(&format!(
            "INSERT INTO campaign_tags (unique_id, user_id, kind, tag, name) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(&new_tag.unique_id)
        .bind(&new_tag.user_id)
        .bind(new_tag.kind.as_str())
        .bind(&new_tag.tag)
        .bind(&new_tag.name)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn list_by_user(
        &self,
        kind: CampaignKind,
        user_id: &str,
    ) -> Result<Vec<CampaignTag>, AppError> {
        let rows = sqlx::query_as::<_, CampaignRow>(&format!(
            "SELECT {COLUMNS} FROM campaign_tags WHERE kind = $1 AND user_id = $2 \
             ORDER BY created_at, id"
        ))
        .bind(kind.as_str())
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(
        &self,
        kind: CampaignKind,
        user_id: &str,
        unique_id: &str,
        patch: CampaignTagPatch,
    ) -> Result<Option<CampaignTag>, AppError> {
        let row = sqlx::query_as::<_, CampaignRow>(&format!(
            "UPDATE campaign_tags \
             SET tag = COALESCE($1, tag), name = COALESCE($2, name), updated_at = NOW() \
             WHERE kind = $3 AND user_id = $4 AND unique_id = $5 \
             RETURNING {COLUMNS}"
        ))
        .bind(patch.tag)
        .bind(patch.name)
        .bind(kind.as_str())
        .bind(user_id)
        .bind(unique_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete(
        &self,
        kind: CampaignKind,
        user_id: &str,
        unique_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM campaign_tags WHERE kind = $1 AND user_id = $2 AND unique_id = $3",
        )
        .bind(kind.as_str())
        .bind(user_id)
        .bind(unique_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
