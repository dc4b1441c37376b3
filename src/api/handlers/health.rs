//! Handlers for liveness and health endpoints.

use axum::{extract::State, http::StatusCode};

use crate::api::dto::envelope::Envelope;
use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: `SELECT 1`
/// 2. **Cache**: backend health check (always ok for the in-process cache)
/// 3. **Visit queue**: channel open, free capacity reported
pub async fn health_handler(State(state): State<AppState>) -> Envelope<HealthResponse> {
    let database = check_database(&state).await;
    let cache = check_cache(&state).await;
    let visit_queue = check_visit_queue(&state);

    let all_healthy = database.is_ok() && cache.is_ok() && visit_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            cache,
            visit_queue,
        },
    };

    let status = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    Envelope::with_status(status, response)
}

/// Liveness probe. `GET /ping`
pub async fn ping_handler() -> Envelope<&'static str> {
    Envelope::ok("pong!")
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.urls.ping().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if state.cache.health_check().await {
        CheckStatus::ok("Cache reachable")
    } else {
        CheckStatus::error("Cache unreachable")
    }
}

fn check_visit_queue(state: &AppState) -> CheckStatus {
    if state.visit_sender.is_closed() {
        CheckStatus::error("Visit queue is closed")
    } else {
        CheckStatus::ok(format!("Free capacity: {}", state.visit_sender.capacity()))
    }
}
