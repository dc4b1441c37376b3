//! Helper functions used across the application.
//!
//! - [`code_generator`] - Short code generation and custom code validation
//! - [`url_normalizer`] - Destination URL and custom domain normalization
//! - [`request_meta`] - Client IP, host and JSON negotiation from request headers
//! - [`user_agent`] - Device, OS and browser classification
//! - [`display_time`] - Timestamp rendering in the display timezone

pub mod code_generator;
pub mod display_time;
pub mod request_meta;
pub mod url_normalizer;
pub mod user_agent;
