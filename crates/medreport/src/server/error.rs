//! Service error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Service-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected before reaching the processor
    #[error("{0}")]
    BadRequest(String),

    /// The processor returned an error outcome
    #[error("{0}")]
    Processing(String),

    /// The upload could not be read or decoded as an image
    #[error("Image processing failed: {0}")]
    ImageFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Processing(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PROCESSING_FAILED"),
            ApiError::ImageFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IMAGE_FAILED"),
        };

        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(code, %message, "Request failed");
        }

        (
            status,
            Json(ErrorBody {
                error: ErrorDetail { code, message },
            }),
        )
            .into_response()
    }
}
