//! Geolocation lookup abstraction used to enrich visit logs.

use async_trait::async_trait;

/// Location resolved for a client IP.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoInfo {
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeoInfo {
    /// Placeholder used whenever a lookup is skipped or fails.
    pub fn unknown() -> Self {
        Self {
            city: "Unknown".to_string(),
            country: "Unknown".to_string(),
            latitude: None,
            longitude: None,
        }
    }
}

/// Errors from a geolocation backend.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    #[error("geolocation request failed: {0}")]
    Request(String),

    #[error("geolocation service returned status {0}")]
    Status(u16),

    #[error("geolocation response could not be parsed: {0}")]
    Parse(String),
}

/// Resolves a client IP to a location.
///
/// Failures are never fatal: the visit worker substitutes [`GeoInfo::unknown`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self, ip: &str) -> Result<GeoInfo, GeoError>;
}

/// Locator that never performs a lookup.
pub struct NoopGeoLocator;

#[async_trait]
impl GeoLocator for NoopGeoLocator {
    async fn locate(&self, _ip: &str) -> Result<GeoInfo, GeoError> {
        Ok(GeoInfo::unknown())
    }
}
