//! Handlers for visit statistics.

use axum::extract::{Path, State};

use crate::api::dto::envelope::Envelope;
use crate::api::dto::stats::{ClickStatsResponse, VisitLogItem, VisitLogsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the number of recorded visits for a short code.
///
/// # Endpoint
///
/// `GET /stats/{short_url}`
///
/// Unknown codes report zero; visits are recorded asynchronously so the
/// count may briefly lag behind redirects.
pub async fn stats_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
) -> Result<Envelope<ClickStatsResponse>, AppError> {
    let click_count = state.visits.click_count(&short_url).await?;

    Ok(Envelope::ok(ClickStatsResponse {
        short_url,
        click_count,
    }))
}

/// Lists visits made from a client IP.
///
/// # Endpoint
///
/// `GET /visitlogs/client/{client_ip}`
///
/// # Errors
///
/// Returns 404 Not Found if the address has no recorded visits.
pub async fn visit_logs_handler(
    Path(client_ip): Path<String>,
    State(state): State<AppState>,
) -> Result<Envelope<VisitLogsResponse>, AppError> {
    let offset = state.settings.display_offset;
    let visit_logs = state
        .visits
        .visits_by_client(&client_ip)
        .await?
        .into_iter()
        .map(|visit| VisitLogItem::from_visit(visit, offset))
        .collect();

    Ok(Envelope::ok(VisitLogsResponse {
        client_ip,
        visit_logs,
    }))
}
