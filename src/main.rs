use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use qr_scan_hw::app;
use qr_scan_hw::app_state::AppState;
use qr_scan_hw::config::AppConfig;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(true);
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    // Initialize structured logging
    init_tracing(config.log_json);

    tracing::info!(
        max_upload_bytes = config.max_upload_bytes,
        multi_detect = config.multi_detect,
        "Initializing qr-scan-hw server"
    );

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_counter!(
        "qr_uploads_total",
        "Upload requests by outcome, including uploads the body limit rejected"
    );
    metrics::describe_counter!("qr_codes_decoded_total", "QR payloads decoded across all uploads");
    metrics::describe_counter!(
        "qr_multi_detect_fallbacks_total",
        "Multi detection failures that fell back to single detection"
    );
    metrics::describe_histogram!("qr_extract_seconds", "Time to decode an image and extract its QR codes");

    let bind_addr = config.bind_addr.clone();
    let state = AppState::from_config(config);
    tracing::info!(detectors = ?state.extractor.strategies(), "QR detectors ready");

    let app = app::router(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
