//! Business logic services for the application layer.

pub mod campaign_service;
pub mod redirect_service;
pub mod shortener_service;
pub mod visit_service;

pub use campaign_service::CampaignService;
pub use redirect_service::{RedirectService, RedirectTarget, Visitor};
pub use shortener_service::{ShortenCommand, ShortenerService};
pub use visit_service::VisitService;
