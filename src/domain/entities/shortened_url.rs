//! Shortened URL entity and its liveness rules.

use chrono::{DateTime, Duration, Utc};

/// Outcome of evaluating a record against its expiration policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Live,
    ExpiredByClicks,
    ExpiredByTime,
}

impl Liveness {
    pub fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }

    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::ExpiredByClicks => "expired_by_clicks",
            Self::ExpiredByTime => "expired_by_time",
        }
    }
}

/// A persisted mapping from a short code (scoped by domain) to a destination URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenedUrl {
    pub id: i64,
    pub main_url: String,
    pub short_url: String,
    pub custom_domain: String,
    pub click_count: i64,
    pub max_clicks: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortenedUrl {
    /// Evaluates the expiration policy at `now`.
    ///
    /// The click ceiling is checked before the time expiry, so a record that
    /// violates both reports [`Liveness::ExpiredByClicks`].
    pub fn liveness(&self, now: DateTime<Utc>) -> Liveness {
        if self.max_clicks.is_some_and(|max| self.click_count >= max) {
            return Liveness::ExpiredByClicks;
        }

        if self.expires_at.is_some_and(|expires| expires <= now) {
            return Liveness::ExpiredByTime;
        }

        Liveness::Live
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.liveness(now).is_live()
    }

    /// Time left before `expires_at`, or `None` for records without expiry.
    pub fn remaining_lifetime(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|expires| (expires - now).max(Duration::zero()))
    }
}

/// Input for inserting a new record. `click_count` starts at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortenedUrl {
    pub main_url: String,
    pub short_url: String,
    pub custom_domain: String,
    pub max_clicks: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}
