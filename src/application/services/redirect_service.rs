//! Redirect engine: lookup, expiration enforcement, click accounting and
//! cache population.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use crate::domain::entities::{Liveness, ShortenedUrl};
use crate::domain::repositories::UrlRepository;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Conditional click updates retried before giving up on a hot record.
const MAX_UPDATE_ATTEMPTS: usize = 5;

/// Who followed the link; forwarded to the visit recorder.
#[derive(Debug, Clone)]
pub struct Visitor {
    pub client_ip: String,
    pub user_agent: Option<String>,
}

/// Result of a successful redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub destination: String,
    pub short_code: String,
}

/// Resolves short codes to destinations.
///
/// The store is consulted on every redirect so expiry and click ceilings are
/// always enforced. A cached destination only has its TTL extended when it
/// still matches the record whose click was counted.
pub struct RedirectService {
    urls: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    visits: mpsc::Sender<VisitEvent>,
    max_cache_ttl: u64,
}

impl RedirectService {
    pub fn new(
        urls: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        visits: mpsc::Sender<VisitEvent>,
        max_cache_ttl: u64,
    ) -> Self {
        Self {
            urls,
            cache,
            visits,
            max_cache_ttl,
        }
    }

    /// Resolves `code`, counts the click and queues a visit event.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the code is unknown or its record has
    ///   expired (the expired record is removed as a side effect)
    /// - [`AppError::Internal`] on database errors or when the click update
    ///   keeps losing to concurrent redirects
    pub async fn redirect(&self, code: &str, visitor: Visitor) -> Result<RedirectTarget, AppError> {
        let cached = match self.cache.get(code).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(short_url = %code, error = %e, "Cache read failed, using database");
                None
            }
        };

        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let Some(record) = self.urls.find_by_short_code(code).await? else {
                metrics::counter!("redirects_total", "outcome" => "not_found").increment(1);
                return Err(not_found(code));
            };

            let now = Utc::now();
            let liveness = record.liveness(now);
            if !liveness.is_live() {
                self.expire(&record, liveness).await?;
                return Err(not_found(code));
            }

            let mut clicked = record.clone();
            clicked.click_count += 1;
            clicked.updated_at = now;

            if !self.urls.update(&clicked, record.click_count).await? {
                debug!(short_url = %code, "Concurrent click update, re-reading");
                continue;
            }

            // The cache is keyed by code alone, so an entry left behind by a
            // record on another domain must not outlive the record now charged.
            match cached.as_deref() {
                Some(url) if url == clicked.main_url => {
                    self.cache_put(code, url, self.max_cache_ttl).await;
                }
                stale => {
                    if stale.is_some() {
                        debug!(short_url = %code, "Cached destination is stale, replacing");
                    }
                    let ttl = clicked
                        .remaining_lifetime(now)
                        .map(|left| (left.num_seconds().max(0) as u64).min(self.max_cache_ttl))
                        .unwrap_or(self.max_cache_ttl);
                    self.cache_put(code, &clicked.main_url, ttl).await;
                }
            }
            let destination = clicked.main_url;

            self.dispatch_visit(code, visitor);
            metrics::counter!("redirects_total", "outcome" => "redirected").increment(1);

            return Ok(RedirectTarget {
                destination,
                short_code: code.to_string(),
            });
        }

        Err(AppError::internal(
            "Failed to record click",
            json!({ "short_url": code, "reason": "too many concurrent updates" }),
        ))
    }

    /// Deletes a non-live record from the store, then from the cache.
    async fn expire(&self, record: &ShortenedUrl, liveness: Liveness) -> Result<(), AppError> {
        self.urls.delete(record).await?;
        if let Err(e) = self.cache.delete(&record.short_url).await {
            warn!(short_url = %record.short_url, error = %e, "Cache delete failed");
        }

        info!(
            short_url = %record.short_url,
            reason = liveness.as_str(),
            "Removed expired short URL"
        );
        metrics::counter!("redirects_total", "outcome" => liveness.as_str()).increment(1);
        Ok(())
    }

    async fn cache_put(&self, code: &str, destination: &str, ttl: u64) {
        if let Err(e) = self.cache.set(code, destination, ttl).await {
            warn!(short_url = %code, error = %e, "Cache write failed");
        }
    }

    fn dispatch_visit(&self, code: &str, visitor: Visitor) {
        let event = VisitEvent::new(
            code.to_string(),
            visitor.client_ip,
            visitor.user_agent.as_deref(),
        );

        match self.visits.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                metrics::counter!("visit_events_dropped_total").increment(1);
                warn!(short_url = %code, "Visit queue full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                warn!(short_url = %code, "Visit worker stopped, dropping event");
            }
        }
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Shortened URL not found", json!({ "short_url": code }))
}
