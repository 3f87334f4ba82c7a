use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::{boundary, routes};

/// Build the full HTTP surface around `state`.
pub fn router(state: AppState, prometheus: Arc<PrometheusHandle>) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        // Static UI (embedded at compile time)
        .route("/", get(routes::index::landing_page).fallback(boundary::method_not_allowed))
        .route(
            "/health",
            get(routes::health::health_check).fallback(boundary::method_not_allowed),
        )
        .route(
            "/upload",
            post(routes::upload::upload).fallback(boundary::method_not_allowed),
        )
        .with_state(state)
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics)
                .fallback(boundary::method_not_allowed)
                .with_state(prometheus),
        )
        .fallback(boundary::route_not_found)
        // the configured ceiling is the only body limit
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(middleware::map_response_with_state(
            max_upload_bytes,
            boundary::json_error_bodies,
        ))
        .layer(CatchPanicLayer::custom(boundary::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
