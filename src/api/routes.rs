//! API route configuration.

use crate::api::handlers::{
    create_campaign_handler, delete_campaign_handler, list_campaigns_handler, shorten_handler,
    stats_handler, update_campaign_handler, visit_logs_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// JSON API routes.
///
/// # Endpoints
///
/// - `POST   /shorten`                                - Create a shortened URL
/// - `GET    /stats/{short_url}`                      - Recorded visit count for a code
/// - `GET    /visitlogs/client/{client_ip}`           - Visits made from an address
/// - `POST   /campaign/{kind}`                        - Create a campaign tag
/// - `GET    /campaign/{kind}/{user_id}`              - List a user's tags of one kind
/// - `PUT    /campaign/{kind}/{user_id}/{unique_id}`  - Update a tag
/// - `DELETE /campaign/{kind}/{user_id}/{unique_id}`  - Delete a tag
///
/// `kind` is one of `source`, `medium` or `name`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/stats/{short_url}", get(stats_handler))
        .route("/visitlogs/client/{client_ip}", get(visit_logs_handler))
        .route("/campaign/{kind}", post(create_campaign_handler))
        .route("/campaign/{kind}/{user_id}", get(list_campaigns_handler))
        .route(
            "/campaign/{kind}/{user_id}/{unique_id}",
            put(update_campaign_handler).delete(delete_campaign_handler),
        )
}
