//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern; the
//! PostgreSQL implementations live in `crate::infrastructure::persistence`.
//! Mock implementations are generated with `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Shortened URL records
//! - [`VisitRepository`] - Visit logs
//! - [`CampaignRepository`] - Campaign tags

pub mod campaign_repository;
pub mod url_repository;
pub mod visit_repository;

pub use campaign_repository::CampaignRepository;
pub use url_repository::UrlRepository;
pub use visit_repository::VisitRepository;

#[cfg(test)]
pub use campaign_repository::MockCampaignRepository;
#[cfg(test)]
pub use url_repository::MockUrlRepository;
#[cfg(test)]
pub use visit_repository::MockVisitRepository;
