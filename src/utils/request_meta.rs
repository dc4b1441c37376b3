//! Request metadata extraction: client IP, host and response negotiation.

use std::net::SocketAddr;

use axum::http::{HeaderMap, header};

/// Determines the client IP.
///
/// When `behind_proxy` is set, the first `X-Forwarded-For` entry and then
/// `X-Real-IP` take precedence over the socket peer address. Otherwise the
/// headers are ignored because any client could forge them.
pub fn extract_client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|xff| xff.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return ip.to_owned();
        }

        if let Some(ip) = headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
        {
            return ip.to_owned();
        }
    }

    peer.ip().to_string()
}

/// Returns the raw `Host` header, or an empty string.
pub fn request_host(headers: &HeaderMap) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// True when the client asked for JSON or is an API explorer (Swagger UI),
/// in which case redirects are acknowledged with a JSON body instead.
pub fn wants_json_ack(headers: &HeaderMap) -> bool {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    accept.contains("json") || user_agent.contains("swagger")
}
