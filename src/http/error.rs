//! Mapping of service errors to HTTP responses.
//!
//! Every failure leaves the service as `{error, message}` JSON. Render and
//! internal faults get a fixed 500 body; their cause only reaches the logs.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::qr::{RenderError, ValidationError};

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn payload_too_large() -> Self {
        Self::new(
            "Payload too large",
            "Request body exceeds the configured size limit",
        )
    }

    pub fn request_timeout() -> Self {
        Self::new("Request timeout", "The request took too long to complete")
    }
}

/// Rewrites the bare 413 and 408 answers of the body-limit and timeout
/// middleware into `{error, message}` JSON.
pub async fn json_middleware_errors(response: Response) -> Response {
    let body = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ErrorBody::payload_too_large(),
        StatusCode::REQUEST_TIMEOUT => ErrorBody::request_timeout(),
        _ => return response,
    };
    (response.status(), Json(body)).into_response()
}

/// Error returned by the QR handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Body(#[from] JsonRejection),
    #[error(transparent)]
    Query(#[from] QueryRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Body(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ApiError::Validation(_) | ApiError::Body(_) | ApiError::Query(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Validation(e) => ErrorBody::new(e.title(), e.message()),
            ApiError::Body(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                ErrorBody::payload_too_large()
            }
            ApiError::Body(rejection) => {
                ErrorBody::new("Invalid request body", rejection.body_text())
            }
            ApiError::Query(rejection) => {
                ErrorBody::new("Invalid query string", rejection.body_text())
            }
            ApiError::Render(_) => {
                ErrorBody::new("Internal server error", "Failed to generate QR code")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Render(e) = &self {
            tracing::error!(error = %e, "Error generating QR code");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
