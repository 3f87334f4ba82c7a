use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::scan::ErrorResponse;
use crate::services::decoder::DecodeError;
use crate::services::validation::ValidationError;

/// Every failure a request can end in. Rendered as `{"ok": false, "error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Could not read the image (unsupported format)")]
    Decode(#[from] DecodeError),

    /// Carries the configured ceiling when the rejecting layer knows it.
    #[error("The image exceeds the upload size limit")]
    PayloadTooLarge(Option<usize>),

    #[error("Route not found")]
    RouteNotFound,

    #[error("HTTP method not allowed")]
    MethodNotAllowed,

    /// The detail is logged, never sent.
    #[error("Unexpected server failure")]
    Internal(String),

    /// Any other error status a layer produced. The status is sent unchanged.
    #[error("{}", reason(.0))]
    Layer(StatusCode),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Decode(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Layer(status) => *status,
        }
    }

    /// Message placed in the response body.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::PayloadTooLarge(Some(limit)) => {
                format!("The image exceeds the upload size limit ({limit} bytes)")
            }
            ApiError::Layer(status) if status.is_server_error() => {
                "Unexpected server failure".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Error for a status produced outside the handlers (method router, body limit, ...).
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => ApiError::RouteNotFound,
            StatusCode::METHOD_NOT_ALLOWED => ApiError::MethodNotAllowed,
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(None),
            s => ApiError::Layer(s),
        }
    }
}

fn reason(status: &StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Request failed")
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        if let ValidationError::Malformed(detail) = &err {
            tracing::debug!(detail = %detail, "Multipart body could not be parsed");
        }
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(detail) => tracing::error!(%status, detail = %detail, "Request failed"),
            ApiError::Layer(_) if status.is_server_error() => {
                tracing::error!(%status, "Layer returned a server error")
            }
            ApiError::Decode(source) => tracing::debug!(%status, error = %source, "Image rejected"),
            other => tracing::debug!(%status, error = %other, "Request rejected"),
        }

        let body = ErrorResponse {
            ok: false,
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
