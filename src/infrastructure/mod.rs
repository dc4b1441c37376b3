//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer:
//!
//! - [`cache`] - Redis, in-process and no-op caches
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`geo`] - HTTP geolocation client

pub mod cache;
pub mod geo;
pub mod persistence;
