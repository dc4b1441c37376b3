//! Short URL creation.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{DurationUnit, NewShortenedUrl, ShortenedUrl};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code, validate_custom_code};
use crate::utils::url_normalizer::{normalize_domain, normalize_main_url};

/// Random codes tried per length before the length grows by one.
const ATTEMPTS_PER_LENGTH: usize = 10;
const MAX_CODE_LENGTH: usize = 8;

/// Input for [`ShortenerService::shorten`].
#[derive(Debug, Clone)]
pub struct ShortenCommand {
    pub main_url: String,
    pub duration_value: i64,
    pub duration_unit: DurationUnit,
    pub max_clicks: Option<i64>,
    pub custom_domain: Option<String>,
    pub custom_code: Option<String>,
}

/// Creates shortened URL records.
///
/// Codes are unique per `(code, domain)` among live records. A live record
/// blocks reuse of its code; an expired one is removed from the store and the
/// cache before the new record is inserted.
pub struct ShortenerService {
    urls: Arc<dyn UrlRepository>,
    cache: Arc<dyn CacheService>,
    default_domain: String,
}

impl ShortenerService {
    pub fn new(
        urls: Arc<dyn UrlRepository>,
        cache: Arc<dyn CacheService>,
        default_domain: impl Into<String>,
    ) -> Self {
        Self {
            urls,
            cache,
            default_domain: default_domain.into(),
        }
    }

    /// Validates the command and stores a new record.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed URL, domain, custom code,
    ///   non-positive limits or a lifetime that overflows
    /// - [`AppError::Conflict`] when the custom code belongs to a live record
    /// - [`AppError::Internal`] when no free random code could be found
    pub async fn shorten(&self, cmd: ShortenCommand) -> Result<ShortenedUrl, AppError> {
        let domain = normalize_domain(cmd.custom_domain.as_deref(), &self.default_domain)
            .map_err(|e| {
                AppError::bad_request(
                    e.to_string(),
                    json!({ "custom_domain": cmd.custom_domain }),
                )
            })?;

        let main_url = normalize_main_url(&cmd.main_url).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "main_url": cmd.main_url }))
        })?;

        if cmd.duration_value < 1 {
            return Err(AppError::bad_request(
                "duration_value must be at least 1",
                json!({ "duration_value": cmd.duration_value }),
            ));
        }

        if let Some(max) = cmd.max_clicks
            && max < 1
        {
            return Err(AppError::bad_request(
                "max_clicks must be at least 1",
                json!({ "max_clicks": max }),
            ));
        }

        let now = Utc::now();
        let expires_at = cmd
            .duration_unit
            .to_duration(cmd.duration_value)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::bad_request(
                    "Duration is too large",
                    json!({
                        "duration_value": cmd.duration_value,
                        "duration_unit": cmd.duration_unit.as_str(),
                    }),
                )
            })?;

        let mut new_url = NewShortenedUrl {
            main_url,
            short_url: String::new(),
            custom_domain: domain,
            max_clicks: cmd.max_clicks,
            created_at: now,
            expires_at: Some(expires_at),
        };

        let record = match cmd.custom_code {
            Some(code) => {
                validate_custom_code(&code)?;
                self.claim_custom_code(&code, &new_url.custom_domain).await?;
                new_url.short_url = code;

                self.urls.insert(new_url).await.map_err(|e| match e {
                    AppError::Conflict { context, .. } => {
                        AppError::conflict("Custom short code already exists.", context)
                    }
                    other => other,
                })?
            }
            None => self.insert_with_random_code(new_url).await?,
        };

        info!(
            short_url = %record.short_url,
            domain = %record.custom_domain,
            "Created short URL"
        );

        Ok(record)
    }

    /// Makes `code` available under `domain`, failing if a live record holds it.
    async fn claim_custom_code(&self, code: &str, domain: &str) -> Result<(), AppError> {
        let Some(existing) = self.urls.find_by_code_and_domain(code, domain).await? else {
            return Ok(());
        };

        let liveness = existing.liveness(Utc::now());
        if liveness.is_live() {
            return Err(AppError::conflict(
                "Custom short code already exists.",
                json!({ "custom_code": code, "custom_domain": domain }),
            ));
        }

        debug!(
            short_url = %code,
            reason = liveness.as_str(),
            "Replacing expired record"
        );
        self.urls.delete(&existing).await?;
        if let Err(e) = self.cache.delete(code).await {
            warn!(short_url = %code, error = %e, "Cache delete failed");
        }

        Ok(())
    }

    async fn insert_with_random_code(
        &self,
        mut new_url: NewShortenedUrl,
    ) -> Result<ShortenedUrl, AppError> {
        for length in DEFAULT_CODE_LENGTH..=MAX_CODE_LENGTH {
            for _ in 0..ATTEMPTS_PER_LENGTH {
                let code = generate_code(length).map_err(|e| {
                    AppError::internal("Failed to generate short code", json!({ "cause": e.to_string() }))
                })?;

                if self
                    .urls
                    .find_by_code_and_domain(&code, &new_url.custom_domain)
                    .await?
                    .is_some()
                {
                    continue;
                }

                new_url.short_url = code;
                match self.urls.insert(new_url.clone()).await {
                    Ok(record) => return Ok(record),
                    Err(AppError::Conflict { .. }) => {
                        debug!(short_url = %new_url.short_url, "Lost insert race, regenerating");
                    }
                    Err(e) => return Err(e),
                }
            }

            debug!(length, "Code space crowded, growing code length");
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::cache::MockCacheService;
    use chrono::Duration;

    fn command(main_url: &str) -> ShortenCommand {
        ShortenCommand {
            main_url: main_url.to_string(),
            duration_value: 1,
            duration_unit: DurationUnit::Hours,
            max_clicks: None,
            custom_domain: None,
            custom_code: None,
        }
    }

    fn stored(new_url: NewShortenedUrl) -> ShortenedUrl {
        ShortenedUrl {
            id: 1,
            main_url: new_url.main_url,
            short_url: new_url.short_url,
            custom_domain: new_url.custom_domain,
            click_count: 0,
            max_clicks: new_url.max_clicks,
            created_at: new_url.created_at,
            updated_at: new_url.created_at,
            expires_at: new_url.expires_at,
        }
    }

    fn existing(code: &str, click_count: i64, max_clicks: Option<i64>) -> ShortenedUrl {
        let now = Utc::now();
        ShortenedUrl {
            id: 7,
            main_url: "http://old.example.com".to_string(),
            short_url: code.to_string(),
            custom_domain: "sho.rt".to_string(),
            click_count,
            max_clicks,
            created_at: now,
            updated_at: now,
            expires_at: Some(now + Duration::hours(1)),
        }
    }

    fn service(urls: MockUrlRepository, cache: MockCacheService) -> ShortenerService {
        ShortenerService::new(Arc::new(urls), Arc::new(cache), "sho.rt")
    }

    #[tokio::test]
    async fn test_shorten_with_random_code() {
        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_code_and_domain()
            .times(1)
            .returning(|_, _| Ok(None));
        urls.expect_insert()
            .withf(|n| {
                n.main_url == "http://example.com"
                    && n.custom_domain == "sho.rt"
                    && n.short_url.len() == 5
                    && n.expires_at.is_some()
            })
            .times(1)
            .returning(|n| Ok(stored(n)));

        let record = service(urls, MockCacheService::new())
            .shorten(command("example.com"))
            .await
            .unwrap();

        assert_eq!(record.short_url.len(), 5);
        let lifetime = record.expires_at.unwrap() - record.created_at;
        assert_eq!(lifetime, Duration::hours(1));
    }

    #[tokio::test]
    async fn test_shorten_retries_on_collision() {
        let mut urls = MockUrlRepository::new();
        let mut seq = mockall::Sequence::new();
        urls.expect_find_by_code_and_domain()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|code, _| Ok(Some(existing(code, 0, None))));
        urls.expect_find_by_code_and_domain()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        urls.expect_insert().times(1).returning(|n| Ok(stored(n)));

        let result = service(urls, MockCacheService::new())
            .shorten(command("example.com"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shorten_grows_code_length_when_crowded() {
        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_code_and_domain()
            .returning(|code, _| {
                if code.len() == DEFAULT_CODE_LENGTH {
                    Ok(Some(existing(code, 0, None)))
                } else {
                    Ok(None)
                }
            });
        urls.expect_insert().times(1).returning(|n| Ok(stored(n)));

        let record = service(urls, MockCacheService::new())
            .shorten(command("example.com"))
            .await
            .unwrap();

        assert_eq!(record.short_url.len(), DEFAULT_CODE_LENGTH + 1);
    }

    #[tokio::test]
    async fn test_shorten_gives_up_when_code_space_exhausted() {
        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_code_and_domain()
            .returning(|code, _| Ok(Some(existing(code, 0, None))));
        urls.expect_insert().times(0);

        let err = service(urls, MockCacheService::new())
            .shorten(command("example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_custom_code_held_by_live_record_conflicts() {
        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_code_and_domain()
            .withf(|code, domain| code == "promo1" && domain == "sho.rt")
            .returning(|code, _| Ok(Some(existing(code, 0, Some(5)))));
        urls.expect_insert().times(0);
        urls.expect_delete().times(0);

        let mut cmd = command("example.com");
        cmd.custom_code = Some("promo1".to_string());

        let err = service(urls, MockCacheService::new())
            .shorten(cmd)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.to_string(), "Custom short code already exists.");
    }

    #[tokio::test]
    async fn test_custom_code_held_by_expired_record_is_replaced() {
        let mut urls = MockUrlRepository::new();
        let mut cache = MockCacheService::new();
        let mut seq = mockall::Sequence::new();

        urls.expect_find_by_code_and_domain()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|code, _| Ok(Some(existing(code, 3, Some(3)))));
        urls.expect_delete()
            .withf(|rec| rec.id == 7)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        cache
            .expect_delete()
            .withf(|key| key == "promo1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        urls.expect_insert()
            .withf(|n| n.short_url == "promo1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|n| Ok(stored(n)));

        let mut cmd = command("example.com");
        cmd.custom_code = Some("promo1".to_string());

        let record = service(urls, cache).shorten(cmd).await.unwrap();
        assert_eq!(record.short_url, "promo1");
        assert_eq!(record.main_url, "http://example.com");
    }

    #[tokio::test]
    async fn test_custom_code_insert_race_reports_duplicate() {
        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_code_and_domain()
            .returning(|_, _| Ok(None));
        urls.expect_insert().times(1).returning(|_| {
            Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "shortened_urls_code_domain_key" }),
            ))
        });

        let mut cmd = command("example.com");
        cmd.custom_code = Some("promo1".to_string());

        let err = service(urls, MockCacheService::new())
            .shorten(cmd)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Custom short code already exists.");
    }

    #[tokio::test]
    async fn test_invalid_custom_code_rejected() {
        let mut cmd = command("example.com");
        cmd.custom_code = Some("a b".to_string());

        let err = service(MockUrlRepository::new(), MockCacheService::new())
            .shorten(cmd)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_invalid_inputs_rejected() {
        let svc = service(MockUrlRepository::new(), MockCacheService::new());

        assert!(matches!(
            svc.shorten(command("not-a-url")).await,
            Err(AppError::Validation { .. })
        ));

        let mut cmd = command("example.com");
        cmd.duration_value = 0;
        assert!(matches!(svc.shorten(cmd).await, Err(AppError::Validation { .. })));

        let mut cmd = command("example.com");
        cmd.max_clicks = Some(0);
        assert!(matches!(svc.shorten(cmd).await, Err(AppError::Validation { .. })));

        let mut cmd = command("example.com");
        cmd.custom_domain = Some("not a domain".to_string());
        assert!(matches!(svc.shorten(cmd).await, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_overflowing_duration_rejected() {
        let mut cmd = command("example.com");
        cmd.duration_value = i64::MAX;
        cmd.duration_unit = DurationUnit::Years;

        let err = service(MockUrlRepository::new(), MockCacheService::new())
            .shorten(cmd)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Duration is too large");
    }

    #[tokio::test]
    async fn test_custom_domain_normalized() {
        let mut urls = MockUrlRepository::new();
        urls.expect_find_by_code_and_domain()
            .withf(|_, domain| domain == "go.example.com")
            .returning(|_, _| Ok(None));
        urls.expect_insert()
            .withf(|n| n.custom_domain == "go.example.com")
            .times(1)
            .returning(|n| Ok(stored(n)));

        let mut cmd = command("https://example.com/landing");
        cmd.custom_domain = Some("https://go.example.com/".to_string());

        let record = service(urls, MockCacheService::new())
            .shorten(cmd)
            .await
            .unwrap();

        assert_eq!(record.main_url, "https://example.com/landing");
    }
}
