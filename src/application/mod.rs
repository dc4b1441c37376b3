//! Application layer services implementing business logic.
//!
//! Services consume repository and cache traits as `Arc<dyn ...>` handles and
//! give HTTP handlers and the admin CLI a narrow API.
//!
//! # Available Services
//!
//! - [`services::ShortenerService`] - Short URL creation and code allocation
//! - [`services::RedirectService`] - Redirect resolution, expiry and click accounting
//! - [`services::VisitService`] - Click counts and visit history
//! - [`services::CampaignService`] - Campaign tag management

pub mod services;
