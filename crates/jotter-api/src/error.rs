//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use jotter_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Error class name, e.g. `NotFoundError`.
    pub error: String,
    /// HTTP status code.
    pub status_code: u16,
}

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Handler result type.
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match err.kind {
            ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Internal => {
                error!(kind = %err.kind, error = %err.message, source = ?err.source, "Internal server error");
                "Something went wrong".to_string()
            }
            _ => {
                if status.is_server_error() {
                    error!(kind = %err.kind, error = %err.message, "Request failed");
                }
                err.message
            }
        };

        let body = ApiErrorResponse {
            success: false,
            message,
            error: err.kind.public_name().to_string(),
            status_code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
