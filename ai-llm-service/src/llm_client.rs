//! Provider facade with enum dispatch.
//!
//! Construct once at process start, wrap in `Arc`, and share between
//! requests. The underlying `reqwest::Client` is reused for every call.

use tracing::debug;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{gemini_service::GeminiService, open_ai_service::OpenAiService},
};

/// Concrete hosted-model client.
#[derive(Debug)]
pub enum LlmClient {
    Gemini(GeminiService),
    OpenAI(OpenAiService),
}

impl LlmClient {
    /// Builds the provider client selected by `cfg.provider`.
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        debug!(provider = %cfg.provider, model = %cfg.model, "initializing LLM client");

        let client = match cfg.provider {
            LlmProvider::Gemini => LlmClient::Gemini(GeminiService::new(cfg)?),
            LlmProvider::OpenAI => LlmClient::OpenAI(OpenAiService::new(cfg)?),
        };
        Ok(client)
    }

    pub fn provider(&self) -> LlmProvider {
        match self {
            Self::Gemini(_) => LlmProvider::Gemini,
            Self::OpenAI(_) => LlmProvider::OpenAI,
        }
    }

    /// Single-turn completion.
    ///
    /// Gemini has no separate system role in this client; the system text is
    /// prepended to the prompt instead.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match self {
            Self::Gemini(c) => match system {
                Some(sys) => c.generate(&format!("{}\n\n{}", sys.trim(), prompt)).await,
                None => c.generate(prompt).await,
            },
            Self::OpenAI(c) => c.generate(prompt, system).await,
        }
    }
}
