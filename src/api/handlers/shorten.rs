//! Handler for the shorten endpoint.

use axum::extract::State;

use crate::api::dto::envelope::Envelope;
use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extract::ValidJson;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a shortened URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "main_url": "example.com",
///   "duration_value": 1,
///   "duration_unit": "hours",
///   "max_clicks": 2,
///   "custom_domain": "go.example.com",
///   "custom_code": "promo-2025"
/// }
/// ```
///
/// Only `main_url` is required.
///
/// # Response
///
/// ```json
/// {
///   "details": {
///     "main_url": "http://example.com",
///     "short_url": "a1B2c",
///     "custom_domain": "127.0.0.1:8000",
///     "max_clicks": 2,
///     "created_at": "2025-03-01 15:30:00",
///     "updated_at": "2025-03-01 15:30:00",
///     "expires_at": "2025-03-01 16:30:00"
///   },
///   "status_code": 200
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for invalid input or a custom code held by a live
/// record.
pub async fn shorten_handler(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<ShortenRequest>,
) -> Result<Envelope<ShortenResponse>, AppError> {
    let record = state.shortener.shorten(payload.into()).await?;

    Ok(Envelope::ok(ShortenResponse::from_record(
        record,
        state.settings.display_offset,
    )))
}
