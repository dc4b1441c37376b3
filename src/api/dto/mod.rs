//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Response bodies are wrapped in [`envelope::Envelope`].

pub mod campaign;
pub mod envelope;
pub mod health;
pub mod redirect;
pub mod shorten;
pub mod stats;
