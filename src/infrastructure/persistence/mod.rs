//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx with
//! bound parameters.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - Shortened URL storage, conditional click updates and purge
//! - [`PgVisitRepository`] - Visit log storage and queries
//! - [`PgCampaignRepository`] - Campaign tag CRUD

pub mod pg_campaign_repository;
pub mod pg_url_repository;
pub mod pg_visit_repository;

pub use pg_campaign_repository::PgCampaignRepository;
pub use pg_url_repository::PgUrlRepository;
pub use pg_visit_repository::PgVisitRepository;
