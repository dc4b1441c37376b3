//! HTTP geolocation client backed by an ipapi-style JSON endpoint.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use tracing::debug;

use crate::domain::geo_locator::{GeoError, GeoInfo, GeoLocator};

/// Distinct IPs remembered between lookups.
const LOOKUP_CACHE_CAPACITY: u64 = 10_000;
/// How long a resolved location is reused.
const LOOKUP_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Response fields read from the lookup endpoint.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    city: Option<String>,
    country_name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    error: bool,
}

/// Resolves IP addresses through an HTTP API.
///
/// `url_template` must contain `{ip}`, e.g. `https://ipapi.co/{ip}/json/`.
/// Successful lookups are memoised per IP for a day, up to a fixed number
/// of addresses.
/// Private, loopback and unparseable addresses resolve to
/// [`GeoInfo::unknown`] without a network call.
pub struct HttpGeoLocator {
    client: reqwest::Client,
    url_template: String,
    cache: Cache<String, GeoInfo>,
}

impl HttpGeoLocator {
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeoError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url_template: url_template.into(),
            cache: Cache::builder()
                .max_capacity(LOOKUP_CACHE_CAPACITY)
                .time_to_live(LOOKUP_CACHE_TTL)
                .build(),
        })
    }

    async fn fetch(&self, ip: &str) -> Result<GeoInfo, GeoError> {
        let url = self.url_template.replace("{ip}", ip);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeoError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(GeoError::Status(resp.status().as_u16()));
        }

        let body: LookupResponse = resp
            .json()
            .await
            .map_err(|e| GeoError::Parse(e.to_string()))?;

        if body.error {
            return Err(GeoError::Parse("lookup service reported an error".to_string()));
        }

        Ok(into_geo_info(body))
    }
}

#[async_trait]
impl GeoLocator for HttpGeoLocator {
    async fn locate(&self, ip: &str) -> Result<GeoInfo, GeoError> {
        if is_private(ip) {
            return Ok(GeoInfo::unknown());
        }

        if let Some(hit) = self.cache.get(ip).await {
            return Ok(hit);
        }

        let info = self.fetch(ip).await?;
        debug!(ip, city = %info.city, country = %info.country, "Geo lookup");
        self.cache.insert(ip.to_owned(), info.clone()).await;

        Ok(info)
    }
}

fn into_geo_info(body: LookupResponse) -> GeoInfo {
    let or_unknown = |v: Option<String>| {
        v.filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string())
    };

    GeoInfo {
        city: or_unknown(body.city),
        country: or_unknown(body.country_name),
        latitude: body.latitude,
        longitude: body.longitude,
    }
}

/// True for addresses a public lookup service cannot resolve: loopback,
/// link-local, private ranges and IPv6 special addresses.
fn is_private(ip: &str) -> bool {
    let ip = ip.strip_prefix("::ffff:").unwrap_or(ip);

    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(addr)) => {
            addr.is_loopback()
                || addr.is_link_local()
                || addr.is_unspecified()
                || addr.is_broadcast()
                || addr.is_private()
        }
        Ok(IpAddr::V6(addr)) => {
            let first = addr.segments()[0];
            addr.is_loopback()
                || addr.is_unspecified()
                || (first & 0xffc0) == 0xfe80
                || (first & 0xfe00) == 0xfc00
        }
        Err(_) => true,
    }
}
