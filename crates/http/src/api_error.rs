//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into proper HTTP responses with JSON body and
//! status codes. Handlers return `Result<Json<T>, ApiError>` instead of
//! losing error context with bare `StatusCode`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sahpaathi_llm::LlmError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to JSON response: `{"error": "message"}`.
///
/// `Internal` logs the real error server-side and returns a static message
/// to the client — no error detail leakage.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request — invalid input from caller.
    BadRequest(String),
    /// 404 Not Found — requested resource doesn't exist.
    NotFound(String),
    /// 502 Bad Gateway — the LLM API failed to produce a reply.
    Upstream(String),
    /// 503 Service Unavailable — required backend not configured or refusing writes.
    ServiceUnavailable(String),
    /// 500 Internal Server Error — unexpected failure. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            },
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<LlmError> for ApiError {
    fn from(err: LlmError) -> Self {
        Self::Upstream(format!("Error generating response: {err}"))
    }
}
