use std::{path::PathBuf, str::FromStr, time::Duration};

use ai_llm_service::{env_opt, remote_config_from_lookup};
use axum::http::HeaderValue;
use report_store::StoreBackend;
use symptom_analyzer::{AnalyzerConfig, REPORT_TTL_DAYS};

use crate::error_handler::AppError;

const DEFAULT_ADDRESS: &str = "0.0.0.0:5000";
const DEFAULT_STORE: &str = "memory";
const DEFAULT_STORE_DIR: &str = "data/reports";
const DEFAULT_SWEEP_SECS: u64 = 3600;

/// Process-wide settings, read once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address, e.g. "0.0.0.0:5000".
    pub address: String,
    pub store: StoreBackend,
    pub report_ttl: chrono::Duration,
    /// How often expired reports are deleted.
    pub sweep_interval: Duration,
    /// Single allowed CORS origin; `None` allows any.
    pub cors_allow_origin: Option<HeaderValue>,
    pub analyzer: AnalyzerConfig,
}

impl AppConfig {
    /// Loads settings from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(env_opt)
    }

    /// Same as [`AppConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let address = lookup("API_ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

        let store_dir = lookup("REPORT_STORE_DIR").unwrap_or_else(|| DEFAULT_STORE_DIR.to_string());
        let store = StoreBackend::parse(
            &lookup("REPORT_STORE").unwrap_or_else(|| DEFAULT_STORE.to_string()),
            PathBuf::from(store_dir),
        )?;

        let ttl_days = parse_setting::<i64>(lookup("REPORT_TTL_DAYS"), "REPORT_TTL_DAYS", "expected whole days")?
            .unwrap_or(REPORT_TTL_DAYS);
        if !(1..=3650).contains(&ttl_days) {
            return Err(AppError::Config {
                var: "REPORT_TTL_DAYS",
                reason: "expected 1..=3650 days",
            });
        }

        let sweep_secs = parse_setting::<u64>(lookup("REPORT_SWEEP_SECS"), "REPORT_SWEEP_SECS", "expected whole seconds")?
            .unwrap_or(DEFAULT_SWEEP_SECS);
        if sweep_secs == 0 {
            return Err(AppError::Config {
                var: "REPORT_SWEEP_SECS",
                reason: "must be at least 1 second",
            });
        }

        let cors_allow_origin = match lookup("CORS_ALLOW_ORIGIN") {
            Some(raw) if raw.trim() != "*" => {
                Some(HeaderValue::from_str(raw.trim()).map_err(|_| AppError::Config {
                    var: "CORS_ALLOW_ORIGIN",
                    reason: "not a valid header value",
                })?)
            }
            _ => None,
        };

        let remote = remote_config_from_lookup(&lookup)?;

        Ok(Self {
            address,
            store,
            report_ttl: chrono::Duration::days(ttl_days),
            sweep_interval: Duration::from_secs(sweep_secs),
            cors_allow_origin,
            analyzer: AnalyzerConfig { remote },
        })
    }
}

/// Parses an optional numeric setting owned by this service.
fn parse_setting<T: FromStr>(
    raw: Option<String>,
    var: &'static str,
    reason: &'static str,
) -> Result<Option<T>, AppError> {
    raw.map(|v| v.trim().parse::<T>().map_err(|_| AppError::Config { var, reason }))
        .transpose()
}
