//! Keeps every response JSON, whichever layer produced it.

use std::any::Any;

use axum::extract::State;
use axum::http::header::{ALLOW, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::models::scan::ScanOutcome;

/// Router fallback for unmatched paths.
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Method fallback for matched paths.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Rewrites non-JSON error responses into the `{"ok": false, "error": ...}` envelope.
///
/// Catches what the handlers never see: 405 from the method router, 413 from
/// the body-limit layer, and any other error a middleware emits with a plain body.
/// The original status is kept.
pub async fn json_error_bodies(State(max_upload_bytes): State<usize>, response: Response) -> Response {
    rewrite_error(max_upload_bytes, response)
}

fn rewrite_error(max_upload_bytes: usize, response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let error = match ApiError::from_status(status) {
        ApiError::PayloadTooLarge(_) => {
            // the body-limit layer rejected the upload before the handler ran
            let label: &'static str = ScanOutcome::Rejected.into();
            metrics::counter!("qr_uploads_total", "outcome" => label).increment(1);
            ApiError::PayloadTooLarge(Some(max_upload_bytes))
        }
        other => other,
    };

    let allow = response.headers().get(ALLOW).cloned();
    let mut rewritten = error.into_response();
    if let Some(allow) = allow {
        rewritten.headers_mut().insert(ALLOW, allow);
    }
    rewritten
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// `CatchPanicLayer` handler: log the panic, answer with a 500 envelope.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(payload.as_ref());
    tracing::error!(panic = %message, "Request handler panicked");
    ApiError::Internal(message).into_response()
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
