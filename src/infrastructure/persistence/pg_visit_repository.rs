//! PostgreSQL implementation of the visit log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewVisitLog, VisitLog};
use crate::domain::repositories::VisitRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct VisitRow {
    id: i64,
    short_url: String,
    client_ip: String,
    city: String,
    country: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    device: String,
    os: String,
    browser: String,
    visited_at: DateTime<Utc>,
}

impl From<VisitRow> for VisitLog {
    fn from(r: VisitRow) -> Self {
        Self {
            id: r.id,
            short_url: r.short_url,
            client_ip: r.client_ip,
            city: r.city,
            country: r.country,
            latitude: r.latitude,
            longitude: r.longitude,
            device: r.device,
            os: r.os,
            browser: r.browser,
            visited_at: r.visited_at,
        }
    }
}

/// PostgreSQL repository for visit logs.
pub struct PgVisitRepository {
    pool: Arc<PgPool>,
}

impl PgVisitRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn insert(&self, visit: NewVisitLog) -> Result<VisitLog, AppError> {
        let row = sqlx::query_as::<_, VisitRow>(
            r#"
            INSERT INTO visit_logs
                (short_url, client_ip, city, country, latitude, longitude, device, os, browser, visited_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, short_url, client_ip, city, country, latitude, longitude,
                      device, os, browser, visited_at
            "#,
        )
        .bind(&visit.short_url)
        .bind(&visit.client_ip)
        .bind(&visit.city)
        .bind(&visit.country)
        .bind(visit.latitude)
        .bind(visit.longitude)
        .bind(&visit.device)
        .bind(&visit.os)
        .bind(&visit.browser)
        .bind(visit.visited_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn count_by_short_url(&self, short_url: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM visit_logs WHERE short_url = $1",
        )
        .bind(short_url)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn find_by_client_ip(&self, client_ip: &str) -> Result<Vec<VisitLog>, AppError> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, short_url, client_ip, city, country, latitude, longitude,
                   device, os, browser, visited_at
            FROM visit_logs
            WHERE client_ip = $1
            ORDER BY visited_at DESC, id DESC
            "#,
        )
        .bind(client_ip)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
