//! Shared application state injected into every handler.

use std::sync::Arc;

use chrono::FixedOffset;
use tokio::sync::mpsc;

use crate::application::services::{
    CampaignService, RedirectService, ShortenerService, VisitService,
};
use crate::config::{Config, MAX_CACHE_TTL_LIMIT};
use crate::domain::repositories::{CampaignRepository, UrlRepository, VisitRepository};
use crate::domain::visit_event::VisitEvent;
use crate::infrastructure::cache::CacheService;
use crate::utils::display_time::offset_from_minutes;

/// Request-facing settings derived from [`Config`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub default_domain: String,
    pub display_offset: FixedOffset,
    pub max_cache_ttl_seconds: u64,
    pub behind_proxy: bool,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_domain: config.default_domain.clone(),
            display_offset: offset_from_minutes(config.display_utc_offset_minutes),
            max_cache_ttl_seconds: config.max_cache_ttl_seconds,
            behind_proxy: config.behind_proxy,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_domain: "127.0.0.1:8000".to_string(),
            display_offset: offset_from_minutes(330),
            max_cache_ttl_seconds: MAX_CACHE_TTL_LIMIT,
            behind_proxy: false,
        }
    }
}

/// Services and handles shared across requests. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    pub redirects: Arc<RedirectService>,
    pub visits: Arc<VisitService>,
    pub campaigns: Arc<CampaignService>,
    /// Used by the health check.
    pub urls: Arc<dyn UrlRepository>,
    pub cache: Arc<dyn CacheService>,
    pub visit_sender: mpsc::Sender<VisitEvent>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        urls: Arc<dyn UrlRepository>,
        visits: Arc<dyn VisitRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        cache: Arc<dyn CacheService>,
        visit_sender: mpsc::Sender<VisitEvent>,
        settings: Settings,
    ) -> Self {
        let shortener = ShortenerService::new(
            urls.clone(),
            cache.clone(),
            settings.default_domain.clone(),
        );
        let redirects = RedirectService::new(
            urls.clone(),
            cache.clone(),
            visit_sender.clone(),
            settings.max_cache_ttl_seconds,
        );

        Self {
            shortener: Arc::new(shortener),
            redirects: Arc::new(redirects),
            visits: Arc::new(VisitService::new(visits)),
            campaigns: Arc::new(CampaignService::new(campaigns)),
            urls,
            cache,
            visit_sender,
            settings: Arc::new(settings),
        }
    }
}
