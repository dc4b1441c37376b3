//! Uniform response envelope shared by all JSON endpoints.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Wraps a payload as `{ "details": <payload>, "status_code": <int> }`.
///
/// Redirect responses are never wrapped.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub details: T,
    pub status_code: u16,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> Envelope<T> {
    /// Wraps a successful payload with status 200.
    pub fn ok(details: T) -> Self {
        Self::with_status(StatusCode::OK, details)
    }

    pub fn with_status(status: StatusCode, details: T) -> Self {
        Self {
            details,
            status_code: status.as_u16(),
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_serialization() {
        let envelope = Envelope::ok(json!({ "short_url": "ab1cd" }));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value, json!({ "details": { "short_url": "ab1cd" }, "status_code": 200 }));
    }

    #[test]
    fn test_envelope_custom_status() {
        let envelope = Envelope::with_status(StatusCode::NOT_FOUND, "missing");
        let response = envelope.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
