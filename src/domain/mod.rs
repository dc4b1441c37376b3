//! Domain layer containing business entities and contracts.
//!
//! - [`entities`] - Core business data structures and the expiration policy
//! - [`repositories`] - Data access trait definitions
//! - [`geo_locator`] - Geolocation contract used for visit enrichment
//! - [`visit_event`] - Visit event passed to the background worker
//! - [`visit_worker`] - Asynchronous visit enrichment and persistence
//!
//! # Visit Processing Flow
//!
//! 1. The redirect handler resolves a live record
//! 2. A [`visit_event::VisitEvent`] is sent to a bounded channel
//! 3. [`visit_worker::run_visit_worker`] enriches it (user agent, location)
//! 4. The visit is persisted via [`repositories::VisitRepository`] with retries

pub mod entities;
pub mod geo_locator;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
