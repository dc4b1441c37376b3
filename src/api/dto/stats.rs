//! DTOs for visit statistics endpoints.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::domain::entities::VisitLog;
use crate::utils::display_time::format_display;

/// Number of recorded visits for a short code.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClickStatsResponse {
    pub short_url: String,
    pub click_count: i64,
}

/// Visits made from one client address.
#[derive(Debug, Serialize, Deserialize)]
pub struct VisitLogsResponse {
    pub client_ip: String,
    pub visit_logs: Vec<VisitLogItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisitLogItem {
    pub id: i64,
    pub short_url: String,
    pub client_ip: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub device: String,
    pub os: String,
    pub browser: String,
    pub visited_at: String,
}

impl VisitLogItem {
    pub fn from_visit(visit: VisitLog, offset: FixedOffset) -> Self {
        Self {
            id: visit.id,
            visited_at: format_display(visit.visited_at, offset),
            short_url: visit.short_url,
            client_ip: visit.client_ip,
            city: visit.city,
            country: visit.country,
            latitude: visit.latitude,
            longitude: visit.longitude,
            device: visit.device,
            os: visit.os,
            browser: visit.browser,
        }
    }
}
