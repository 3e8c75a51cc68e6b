use std::sync::Arc;

use report_store::ReportStore;
use symptom_analyzer::SymptomAnalyzer;

use crate::{core::app_config::AppConfig, error_handler::AppError};

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Picks the model-backed or rule-based path per request.
    pub analyzer: SymptomAnalyzer,
    /// Best-effort report persistence.
    pub store: Arc<dyn ReportStore>,
}

impl AppState {
    pub fn new(config: AppConfig, analyzer: SymptomAnalyzer, store: Arc<dyn ReportStore>) -> Self {
        Self {
            config,
            analyzer,
            store,
        }
    }

    /// Builds the analyzer and opens the configured report store.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let analyzer = SymptomAnalyzer::new(config.analyzer.clone())?;
        let store = config.store.open().await?;
        Ok(Self::new(config, analyzer, store))
    }
}
