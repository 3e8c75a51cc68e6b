//! Remote model config loaded from environment variables.
//!
//! The remote analysis path is opt-in: it is enabled only when a credential is
//! present. Everything else has a provider-specific default.
//!
//! # Environment variables
//!
//! - `LLM_API_KEY` (alias `GEMINI_API_KEY`) = credential; absent → remote path disabled
//! - `LLM_PROVIDER`     = `gemini` (default) or `openai`
//! - `LLM_MODEL`        = model id (provider default otherwise)
//! - `LLM_ENDPOINT`     = API base URL (provider default otherwise)
//! - `LLM_TIMEOUT_SECS` = request timeout, `1..=120` (default 20)
//! - `LLM_MAX_TOKENS`   = optional max output tokens (u32)
//! - `LLM_TEMPERATURE`  = optional sampling temperature, `0.0..=2.0` (default 0.4)

use crate::{
    config::{
        llm_model_config::{DEFAULT_TIMEOUT_SECS, LlmModelConfig},
        llm_provider::LlmProvider,
    },
    error_handler::{
        ConfigError, Result, env_opt, parse_opt, validate_http_endpoint, validate_range_f32,
    },
};

/// Credential variables, checked in order.
pub const API_KEY_VARS: [&str; 2] = ["LLM_API_KEY", "GEMINI_API_KEY"];

const DEFAULT_TEMPERATURE: f32 = 0.4;
const MAX_TIMEOUT_SECS: u64 = 120;

/// Builds the remote model config from the process environment.
///
/// Returns `Ok(None)` when no credential is configured.
///
/// # Errors
///
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_PROVIDER`
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::OutOfRange`] for bad knobs
/// - [`ConfigError::InvalidFormat`] if `LLM_ENDPOINT` is not http(s)
pub fn remote_config_from_env() -> Result<Option<LlmModelConfig>> {
    remote_config_from_lookup(env_opt)
}

/// Same as [`remote_config_from_env`], reading values through `lookup`.
///
/// `lookup` must return `None` for unset or blank variables.
pub fn remote_config_from_lookup<F>(lookup: F) -> Result<Option<LlmModelConfig>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(api_key) = API_KEY_VARS.iter().copied().find_map(&lookup) else {
        return Ok(None);
    };

    let provider = match lookup("LLM_PROVIDER") {
        Some(raw) => raw.parse::<LlmProvider>()?,
        None => LlmProvider::Gemini,
    };

    let model = lookup("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string());
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let endpoint = lookup("LLM_ENDPOINT").unwrap_or_else(|| provider.default_endpoint().to_string());
    validate_http_endpoint("LLM_ENDPOINT", &endpoint)?;

    let timeout_secs = parse_opt::<u64>("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS"), "expected u64")?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if !(1..=MAX_TIMEOUT_SECS).contains(&timeout_secs) {
        return Err(ConfigError::OutOfRange {
            field: "LLM_TIMEOUT_SECS",
            detail: "expected 1..=120 seconds",
        }
        .into());
    }

    let max_tokens = parse_opt::<u32>("LLM_MAX_TOKENS", lookup("LLM_MAX_TOKENS"), "expected u32")?;

    let temperature = parse_opt::<f32>(
        "LLM_TEMPERATURE",
        lookup("LLM_TEMPERATURE"),
        "expected a decimal number",
    )?
    .unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("LLM_TEMPERATURE", temperature, 0.0, 2.0, "expected 0.0..=2.0")?;

    Ok(Some(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens,
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error_handler::AiLlmError;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn no_credential_disables_remote_path() {
        let cfg = remote_config_from_lookup(lookup_from(&[("LLM_MODEL", "x")])).unwrap();
        assert!(cfg.is_none());
    }

    #[test]
    fn gemini_defaults_apply() {
        let cfg = remote_config_from_lookup(lookup_from(&[("GEMINI_API_KEY", "k")]))
            .unwrap()
            .unwrap();
        assert_eq!(cfg.provider, LlmProvider::Gemini);
        assert_eq!(cfg.model, "gemini-1.5-flash");
        assert_eq!(cfg.endpoint, "https://generativelanguage.googleapis.com");
        assert_eq!(cfg.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert_eq!(cfg.temperature, Some(DEFAULT_TEMPERATURE));
    }

    #[test]
    fn openai_with_overrides() {
        let cfg = remote_config_from_lookup(lookup_from(&[
            ("LLM_API_KEY", "sk"),
            ("LLM_PROVIDER", "openai"),
            ("LLM_MODEL", "gpt-4o"),
            ("LLM_ENDPOINT", "http://localhost:8080"),
            ("LLM_TIMEOUT_SECS", "15"),
            ("LLM_MAX_TOKENS", "800"),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(cfg.provider, LlmProvider::OpenAI);
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.timeout_secs, Some(15));
        assert_eq!(cfg.max_tokens, Some(800));
    }

    #[test]
    fn timeout_out_of_range_is_rejected() {
        let err = remote_config_from_lookup(lookup_from(&[
            ("LLM_API_KEY", "sk"),
            ("LLM_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::OutOfRange { field: "LLM_TIMEOUT_SECS", .. })
        ));
    }

    #[test]
    fn bad_endpoint_is_rejected() {
        let err = remote_config_from_lookup(lookup_from(&[
            ("LLM_API_KEY", "sk"),
            ("LLM_ENDPOINT", "generativelanguage.googleapis.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AiLlmError::Config(ConfigError::InvalidFormat { .. })));
    }
}
