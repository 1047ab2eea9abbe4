//! Error types for hoop-as

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::session::ProgressiveError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409) - e.g., session already holds its maximum clip count
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Gone (410) - session id was explicitly deleted
    #[error("Gone: {0}")]
    Gone(String),

    /// Payload too large (413)
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Unsupported media type (415) - upload is not a recognised video container
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Analysis collaborator failed (502)
    #[error("Analysis failed: {0}")]
    BadGateway(String),

    /// Analysis collaborator exceeded its deadline (504)
    #[error("Analysis timed out: {0}")]
    GatewayTimeout(String),

}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "SESSION_FULL", msg),
            ApiError::Gone(msg) => (StatusCode::GONE, "SESSION_DELETED", msg),
            ApiError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg)
            }
            ApiError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg,
            ),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "ANALYSIS_FAILED", msg),
            ApiError::GatewayTimeout(msg) => {
                (StatusCode::GATEWAY_TIMEOUT, "ANALYSIS_TIMEOUT", msg)
            }
        };

        if status.is_server_error() {
            tracing::error!(status = %status, code = error_code, message = %message, "Request failed");
        } else {
            tracing::debug!(status = %status, code = error_code, message = %message, "Request rejected");
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<ProgressiveError> for ApiError {
    fn from(err: ProgressiveError) -> Self {
        match err {
            ProgressiveError::InvalidSessionId(msg) => ApiError::BadRequest(msg),
            ProgressiveError::SessionDeleted(id) => ApiError::Gone(format!(
                "Session {id} was deleted; start a new session to continue"
            )),
            ProgressiveError::SessionFull { session_id, max_clips } => ApiError::Conflict(format!(
                "Session {session_id} already holds {max_clips} clips"
            )),
            ProgressiveError::Analysis(e) => ApiError::BadGateway(e.to_string()),
            ProgressiveError::AnalysisTimeout(after) => ApiError::GatewayTimeout(format!(
                "no analysis result after {} s",
                after.as_secs()
            )),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
