use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::detector::QrExtractor;

/// Shared application state passed to all route handlers.
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub extractor: Arc<QrExtractor>,
}

impl AppState {
    pub fn new(config: AppConfig, extractor: QrExtractor) -> Self {
        Self {
            config: Arc::new(config),
            extractor: Arc::new(extractor),
        }
    }

    /// State with the detectors this build offers, as selected by `config`.
    pub fn from_config(config: AppConfig) -> Self {
        let extractor = QrExtractor::from_flags(config.multi_detect);
        Self::new(config, extractor)
    }
}
