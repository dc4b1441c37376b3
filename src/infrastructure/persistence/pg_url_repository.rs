//! PostgreSQL implementation of the shortened URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortenedUrl, ShortenedUrl};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    main_url: String,
    short_url: String,
    custom_domain: String,
    click_count: i64,
    max_clicks: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<UrlRow> for ShortenedUrl {
    fn from(r: UrlRow) -> Self {
        Self {
            id: r.id,
            main_url: r.main_url,
            short_url: r.short_url,
            custom_domain: r.custom_domain,
            click_count: r.click_count,
            max_clicks: r.max_clicks,
            created_at: r.created_at,
            updated_at: r.updated_at,
            expires_at: r.expires_at,
        }
    }
}

const COLUMNS: &str = "id, main_url, short_url, custom_domain, click_count, max_clicks, created_at, updated_at, expires_at";

/// PostgreSQL repository for shortened URL records.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_code_and_domain(
        &self,
        code: &str,
        domain: &str,
    ) -> Result<Option<ShortenedUrl>, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {COLUMNS} FROM shortened_urls WHERE short_url = $1 AND custom_domain = $2"
        ))
        .bind(code)
        .bind(domain)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<ShortenedUrl>, AppError> {
        // The same code may exist under several domains; the newest wins.
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "SELECT {COLUMNS} FROM shortened_urls WHERE short_url = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert(&self, new_url: NewShortenedUrl) -> Result<ShortenedUrl, AppError> {
        let row = sqlx::query_as::<_, UrlRow>(&format!(
            "INSERT INTO shortened_urls \
                (main_url, short_url, custom_domain, click_count, max_clicks, created_at, updated_at, expires_at) \
             VALUES ($1, $2, $3, 0, $4, $5, $5, $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new_url.main_url)
        .bind(&new_url.short_url)
        .bind(&new_url.custom_domain)
        .bind(new_url.max_clicks)
        .bind(new_url.created_at)
        .bind(new_url.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        record: &ShortenedUrl,
        expected_click_count: i64,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE shortened_urls SET click_count = $1, updated_at = $2 \
             WHERE id = $3 AND click_count = $4",
        )
        .bind(record.click_count)
        .bind(record.updated_at)
        .bind(record.id)
        .bind(expected_click_count)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, record: &ShortenedUrl) -> Result<(), AppError> {
        sqlx::query("DELETE FROM shortened_urls WHERE id = $1")
            .bind(record.id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, AppError> {
        let codes = sqlx::query_scalar::<_, String>(
            "DELETE FROM shortened_urls \
             WHERE (max_clicks IS NOT NULL AND click_count >= max_clicks) \
                OR (expires_at IS NOT NULL AND expires_at <= $1) \
             RETURNING short_url",
        )
        .bind(now)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(codes)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
