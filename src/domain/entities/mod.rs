//! Core domain entities.
//!
//! Entities are plain data structures; the only business rule living here is
//! the expiration policy of [`ShortenedUrl`].
//!
//! # Entity Types
//!
//! - [`ShortenedUrl`] - A short code mapped to a destination URL
//! - [`VisitLog`] - An enriched visit to a short code
//! - [`CampaignTag`] - A user-owned campaign source, medium or name
//!
//! Creation inputs use separate `New*` structs.

pub mod campaign;
pub mod duration_unit;
pub mod shortened_url;
pub mod visit_log;

pub use campaign::{CampaignKind, CampaignTag, CampaignTagPatch, NewCampaignTag};
pub use duration_unit::{DurationUnit, UnsupportedDurationUnit};
pub use shortened_url::{Liveness, NewShortenedUrl, ShortenedUrl};
pub use visit_log::{NewVisitLog, VisitLog};
