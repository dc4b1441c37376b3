//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod campaigns;
pub mod health;
pub mod redirect;
pub mod shorten;
pub mod stats;

pub use campaigns::{
    create_campaign_handler, delete_campaign_handler, list_campaigns_handler,
    update_campaign_handler,
};
pub use health::{health_handler, ping_handler};
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::{stats_handler, visit_logs_handler};
