#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo, routing::get};
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;
use url_redirector::api::handlers::{health_handler, ping_handler, redirect_handler};
use url_redirector::domain::entities::{
    CampaignKind, CampaignTag, CampaignTagPatch, NewCampaignTag, NewShortenedUrl, NewVisitLog,
    ShortenedUrl, VisitLog,
};
use url_redirector::domain::repositories::{CampaignRepository, UrlRepository, VisitRepository};
use url_redirector::domain::visit_event::VisitEvent;
use url_redirector::error::AppError;
use url_redirector::infrastructure::cache::MemoryCache;
use url_redirector::state::{AppState, Settings};

/// Shortened URL store backed by a vector, with the same conflict and
/// compare-and-set semantics as the PostgreSQL repository.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    records: Mutex<Vec<ShortenedUrl>>,
    next_id: AtomicI64,
}

impl InMemoryUrlRepository {
    pub fn seed(&self, main_url: &str, code: &str, domain: &str) -> ShortenedUrl {
        self.seed_with(main_url, code, domain, |_| {})
    }

    pub fn seed_with(
        &self,
        main_url: &str,
        code: &str,
        domain: &str,
        customize: impl FnOnce(&mut ShortenedUrl),
    ) -> ShortenedUrl {
        let now = Utc::now();
        let mut record = ShortenedUrl {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            main_url: main_url.to_string(),
            short_url: code.to_string(),
            custom_domain: domain.to_string(),
            click_count: 0,
            max_clicks: None,
            created_at: now,
            updated_at: now,
            expires_at: Some(now + Duration::hours(1)),
        };
        customize(&mut record);

        self.records.lock().unwrap().push(record.clone());
        record
    }

    pub fn all(&self) -> Vec<ShortenedUrl> {
        self.records.lock().unwrap().clone()
    }

    pub fn find(&self, code: &str) -> Option<ShortenedUrl> {
        self.all().into_iter().find(|r| r.short_url == code)
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn find_by_code_and_domain(
        &self,
        code: &str,
        domain: &str,
    ) -> Result<Option<ShortenedUrl>, AppError> {
        Ok(self
            .all()
            .into_iter()
            .find(|r| r.short_url == code && r.custom_domain == domain))
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<ShortenedUrl>, AppError> {
        Ok(self
            .all()
            .into_iter()
            .filter(|r| r.short_url == code)
            .max_by_key(|r| (r.created_at, r.id)))
    }

    async fn insert(&self, new_url: NewShortenedUrl) -> Result<ShortenedUrl, AppError> {
        let mut records = self.records.lock().unwrap();

        if records
            .iter()
            .any(|r| r.short_url == new_url.short_url && r.custom_domain == new_url.custom_domain)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "shortened_urls_code_domain_key" }),
            ));
        }

        let record = ShortenedUrl {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            main_url: new_url.main_url,
            short_url: new_url.short_url,
            custom_domain: new_url.custom_domain,
            click_count: 0,
            max_clicks: new_url.max_clicks,
            created_at: new_url.created_at,
            updated_at: new_url.created_at,
            expires_at: new_url.expires_at,
        };
        records.push(record.clone());

        Ok(record)
    }

    async fn update(
        &self,
        record: &ShortenedUrl,
        expected_click_count: i64,
    ) -> Result<bool, AppError> {
        let mut records = self.records.lock().unwrap();

        match records
            .iter_mut()
            .find(|r| r.id == record.id && r.click_count == expected_click_count)
        {
            Some(stored) => {
                stored.click_count = record.click_count;
                stored.updated_at = record.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, record: &ShortenedUrl) -> Result<(), AppError> {
        self.records.lock().unwrap().retain(|r| r.id != record.id);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<Vec<String>, AppError> {
        let mut records = self.records.lock().unwrap();
        let (live, expired): (Vec<_>, Vec<_>) = records.drain(..).partition(|r| r.is_live(now));
        *records = live;

        Ok(expired.into_iter().map(|r| r.short_url).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryVisitRepository {
    visits: Mutex<Vec<VisitLog>>,
}

impl InMemoryVisitRepository {
    pub fn all(&self) -> Vec<VisitLog> {
        self.visits.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisitRepository for InMemoryVisitRepository {
    async fn insert(&self, visit: NewVisitLog) -> Result<VisitLog, AppError> {
        let mut visits = self.visits.lock().unwrap();
        let log = VisitLog {
            id: visits.len() as i64 + 1,
            short_url: visit.short_url,
            client_ip: visit.client_ip,
            city: visit.city,
            country: visit.country,
            latitude: visit.latitude,
            longitude: visit.longitude,
            device: visit.device,
            os: visit.os,
            browser: visit.browser,
            visited_at: visit.visited_at,
        };
        visits.push(log.clone());

        Ok(log)
    }

    async fn count_by_short_url(&self, short_url: &str) -> Result<i64, AppError> {
        Ok(self.all().iter().filter(|v| v.short_url == short_url).count() as i64)
    }

    async fn find_by_client_ip(&self, client_ip: &str) -> Result<Vec<VisitLog>, AppError> {
        let mut visits: Vec<_> = self
            .all()
            .into_iter()
            .filter(|v| v.client_ip == client_ip)
            .collect();
        visits.sort_by(|a, b| b.visited_at.cmp(&a.visited_at));

        Ok(visits)
    }
}

#[derive(Default)]
pub struct InMemoryCampaignRepository {
    tags: Mutex<Vec<CampaignTag>>,
}

fn tag_conflict(constraint: &str) -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({ "constraint": constraint }),
    )
}

#[async_trait]
impl CampaignRepository for InMemoryCampaignRepository {
    async fn create(&self, new_tag: NewCampaignTag) -> Result<CampaignTag, AppError> {
        let mut tags = self.tags.lock().unwrap();

        if tags.iter().any(|t| t.unique_id == new_tag.unique_id) {
            return Err(tag_conflict("campaign_tags_unique_id_key"));
        }
        if tags.iter().any(|t| {
            t.user_id == new_tag.user_id && t.kind == new_tag.kind && t.tag == new_tag.tag
        }) {
            return Err(tag_conflict("campaign_tags_user_kind_tag_key"));
        }

        let now = Utc::now();
        let tag = CampaignTag {
            id: tags.len() as i64 + 1,
            unique_id: new_tag.unique_id,
            user_id: new_tag.user_id,
            kind: new_tag.kind,
            tag: new_tag.tag,
            name: new_tag.name,
            created_at: now,
            updated_at: now,
        };
        tags.push(tag.clone());

        Ok(tag)
    }

    async fn list_by_user(
        &self,
        kind: CampaignKind,
        user_id: &str,
    ) -> Result<Vec<CampaignTag>, AppError> {
        Ok(self
            .tags
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.kind == kind && t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        kind: CampaignKind,
        user_id: &str,
        unique_id: &str,
        patch: CampaignTagPatch,
    ) -> Result<Option<CampaignTag>, AppError> {
        let mut tags = self.tags.lock().unwrap();

        if let Some(new_tag) = &patch.tag
            && tags.iter().any(|t| {
                t.user_id == user_id && t.kind == kind && &t.tag == new_tag && t.unique_id != unique_id
            })
        {
            return Err(tag_conflict("campaign_tags_user_kind_tag_key"));
        }

        let Some(tag) = tags
            .iter_mut()
            .find(|t| t.kind == kind && t.user_id == user_id && t.unique_id == unique_id)
        else {
            return Ok(None);
        };

        if let Some(new_tag) = patch.tag {
            tag.tag = new_tag;
        }
        if let Some(name) = patch.name {
            tag.name = name;
        }
        tag.updated_at = Utc::now();

        Ok(Some(tag.clone()))
    }

    async fn delete(
        &self,
        kind: CampaignKind,
        user_id: &str,
        unique_id: &str,
    ) -> Result<bool, AppError> {
        let mut tags = self.tags.lock().unwrap();
        let before = tags.len();
        tags.retain(|t| !(t.kind == kind && t.user_id == user_id && t.unique_id == unique_id));

        Ok(tags.len() != before)
    }
}

/// Everything a handler test needs to drive requests and inspect side effects.
pub struct TestContext {
    pub state: AppState,
    pub urls: Arc<InMemoryUrlRepository>,
    pub visits: Arc<InMemoryVisitRepository>,
    pub campaigns: Arc<InMemoryCampaignRepository>,
    pub cache: Arc<MemoryCache>,
    pub visit_rx: mpsc::Receiver<VisitEvent>,
}

pub fn create_test_state() -> TestContext {
    create_test_state_with(Settings::default())
}

pub fn create_test_state_with(settings: Settings) -> TestContext {
    let urls = Arc::new(InMemoryUrlRepository::default());
    let visits = Arc::new(InMemoryVisitRepository::default());
    let campaigns = Arc::new(InMemoryCampaignRepository::default());
    let cache = Arc::new(MemoryCache::new());
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(
        urls.clone(),
        visits.clone(),
        campaigns.clone(),
        cache.clone(),
        tx,
        settings,
    );

    TestContext {
        state,
        urls,
        visits,
        campaigns,
        cache,
        visit_rx: rx,
    }
}

/// Application routes with a fixed peer address instead of a real socket.
pub fn test_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ping", get(ping_handler))
        .route("/{short_url}", get(redirect_handler))
        .merge(url_redirector::api::routes::routes())
        .layer(MockConnectInfoLayer)
        .with_state(state)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(test_router(state)).unwrap()
}

pub const PEER_IP: &str = "127.0.0.1";

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Waits until the background worker has stored `expected` visits.
pub async fn wait_for_visits(visits: &InMemoryVisitRepository, expected: usize) {
    for _ in 0..100 {
        if visits.all().len() >= expected {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!(
        "worker stored {} visits, expected {expected}",
        visits.all().len()
    );
}
