//! DTOs for the shorten endpoint.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::ShortenCommand;
use crate::domain::entities::{DurationUnit, ShortenedUrl};
use crate::utils::display_time::format_display;

fn default_duration_value() -> i64 {
    1
}

/// Request to shorten a URL.
///
/// Lifetime defaults to one hour. `main_url` without a scheme is treated as
/// `http://`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 2048, message = "main_url must be 1-2048 characters"))]
    pub main_url: String,

    #[serde(default = "default_duration_value")]
    #[validate(range(min = 1, message = "duration_value must be at least 1"))]
    pub duration_value: i64,

    #[serde(default)]
    pub duration_unit: DurationUnit,

    #[validate(range(min = 1, message = "max_clicks must be at least 1"))]
    pub max_clicks: Option<i64>,

    pub custom_domain: Option<String>,

    pub custom_code: Option<String>,
}

impl From<ShortenRequest> for ShortenCommand {
    fn from(req: ShortenRequest) -> Self {
        Self {
            main_url: req.main_url,
            duration_value: req.duration_value,
            duration_unit: req.duration_unit,
            max_clicks: req.max_clicks,
            custom_domain: req.custom_domain,
            custom_code: req.custom_code,
        }
    }
}

/// Created record with timestamps rendered in the display timezone.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub main_url: String,
    pub short_url: String,
    pub custom_domain: String,
    pub max_clicks: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
    pub expires_at: Option<String>,
}

impl ShortenResponse {
    pub fn from_record(record: ShortenedUrl, offset: FixedOffset) -> Self {
        Self {
            created_at: format_display(record.created_at, offset),
            updated_at: format_display(record.updated_at, offset),
            expires_at: record.expires_at.map(|ts| format_display(ts, offset)),
            main_url: record.main_url,
            short_url: record.short_url,
            custom_domain: record.custom_domain,
            max_clicks: record.max_clicks,
        }
    }
}
