//! Visit log entity recorded for each successful redirect.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// An enriched record of a single visit to a short code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitLog {
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
    pub visited_at: DateTime<Utc>,
}

/// Input data for recording a visit.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisitLog {
    pub short_url: String,
    pub client_ip: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub device: String,
    pub os: String,
    pub browser: String,
    pub visited_at: DateTime<Utc>,
}
