//! Application error taxonomy and its HTTP representation.
//!
//! Every JSON error body uses the same envelope as successful responses:
//!
//! ```json
//! {
//!   "details": { "error": "not_found", "message": "Shortened URL not found", "context": {} },
//!   "status_code": 404
//! }
//! ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::api::dto::envelope::Envelope;

/// Machine-readable error payload placed under `details`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub error: &'static str,
    pub message: String,
    pub context: Value,
}

/// Errors surfaced by services and handlers.
///
/// Duplicate short codes are reported as [`AppError::Conflict`] but use
/// status 400, matching the public contract of the `/shorten` endpoint.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, context: Value },

    #[error("{message}")]
    Conflict { message: String, context: Value },

    #[error("{message}")]
    NotFound { message: String, context: Value },

    /// A third-party dependency failed. Callers absorb this; it only reaches
    /// the HTTP boundary if a handler explicitly propagates it.
    #[error("{message}")]
    Upstream { message: String, context: Value },

    #[error("{message}")]
    Internal { message: String, context: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, context: Value) -> Self {
        Self::Validation {
            message: message.into(),
            context,
        }
    }

    pub fn conflict(message: impl Into<String>, context: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            context,
        }
    }

    pub fn not_found(message: impl Into<String>, context: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    pub fn upstream(message: impl Into<String>, context: Value) -> Self {
        Self::Upstream {
            message: message.into(),
            context,
        }
    }

    pub fn internal(message: impl Into<String>, context: Value) -> Self {
        Self::Internal {
            message: message.into(),
            context,
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Conflict { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into the serializable payload.
    ///
    /// Internal errors drop their context so database details never leave
    /// the process; the context is logged instead.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            Self::Validation { message, context } => ErrorInfo {
                error: "validation_error",
                message: message.clone(),
                context: context.clone(),
            },
            Self::Conflict { message, context } => ErrorInfo {
                error: "conflict",
                message: message.clone(),
                context: context.clone(),
            },
            Self::NotFound { message, context } => ErrorInfo {
                error: "not_found",
                message: message.clone(),
                context: context.clone(),
            },
            Self::Upstream { message, .. } => ErrorInfo {
                error: "upstream_error",
                message: message.clone(),
                context: json!({}),
            },
            Self::Internal { message, .. } => ErrorInfo {
                error: "internal_error",
                message: message.clone(),
                context: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal { message, context } | Self::Upstream { message, context } = &self {
            tracing::error!(%message, %context, "request failed");
        }

        Envelope::with_status(self.status_code(), self.to_error_info()).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::internal("Database error", json!({ "cause": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let fields: serde_json::Map<String, Value> = e
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string())
                    })
                    .collect();
                (field.to_string(), json!(messages))
            })
            .collect();

        AppError::bad_request("Validation failed", Value::Object(fields))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
