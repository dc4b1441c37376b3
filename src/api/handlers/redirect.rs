//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};
use std::net::SocketAddr;

use crate::api::dto::envelope::Envelope;
use crate::api::dto::redirect::RedirectAck;
use crate::application::services::Visitor;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::request_meta::{extract_client_ip, request_host, wants_json_ack};

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /{short_url}`
///
/// # Request Flow
///
/// 1. Resolve the code through the redirect engine (cache, then database,
///    expiry and click ceiling checks, click accounting)
/// 2. Queue a visit event for the background recorder
/// 3. Return 307 Temporary Redirect, or a JSON acknowledgment when the
///    client asked for JSON or is Swagger UI
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or expired.
pub async fn redirect_handler(
    Path(short_url): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let code = short_url.trim().trim_matches(|c| c == '"' || c == '\'');

    let visitor = Visitor {
        client_ip: extract_client_ip(&headers, addr, state.settings.behind_proxy),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    };

    let target = state.redirects.redirect(code, visitor).await?;

    if wants_json_ack(&headers) {
        let ack = RedirectAck {
            message: "Redirection successful.".to_string(),
            redirect_to: target.destination,
            short_code: target.short_code,
            domain: request_host(&headers),
        };
        return Ok(Envelope::ok(ack).into_response());
    }

    Ok(Redirect::temporary(&target.destination).into_response())
}
