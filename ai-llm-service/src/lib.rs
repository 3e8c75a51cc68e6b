//! Hosted LLM client used by the symptom analyzer.
//!
//! - [`config`] holds the model config and the env loader that decides whether
//!   the remote path is enabled at all.
//! - [`services`] contains one thin HTTP client per provider.
//! - [`llm_client::LlmClient`] dispatches a prompt to the configured provider.
//! - [`telemetry`] renders this crate's events in the host binary.

pub mod config;
pub mod error_handler;
pub mod llm_client;
pub mod services;
pub mod telemetry;

pub use config::{
    default_config::{remote_config_from_env, remote_config_from_lookup},
    llm_model_config::LlmModelConfig,
    llm_provider::LlmProvider,
};
pub use error_handler::{
    AiLlmError, ConfigError, ProviderError, ProviderErrorKind, env_opt,
};
pub use llm_client::LlmClient;
