//! Model-backed analysis.
//!
//! One completion per assessment, no retry. The caller decides what to do
//! with an error; [`crate::analyzer::SymptomAnalyzer`] falls back to the rules.

use std::{future::Future, pin::Pin};

use ai_llm_service::{AiLlmError, LlmClient};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

use crate::{
    json_extract::{ExtractError, extract_first_object},
    prompt::{SYSTEM_POLICY, build_user_prompt},
    types::{Analysis, PossibleCondition, Responses, RiskLevel},
};

/// Boxed future returned by [`TextGenerator::generate`].
pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;

/// Anything that turns a prompt into model text.
///
/// Implemented for [`LlmClient`]; tests plug in canned replies.
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(&'a self, system: &'a str, prompt: &'a str) -> GenerateFuture<'a>;
}

impl TextGenerator for LlmClient {
    fn generate<'a>(&'a self, system: &'a str, prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(LlmClient::generate(self, prompt, Some(system)))
    }
}

#[derive(Debug, Error)]
pub enum RemoteAnalysisError {
    #[error("could not serialize responses for the prompt: {0}")]
    Prompt(#[source] serde_json::Error),

    #[error("model request failed: {0}")]
    Llm(#[from] AiLlmError),

    #[error("model output unusable: {0}")]
    Output(#[from] ExtractError),
}

/// Shape requested from the model. Every field is optional; absent and
/// `null` fields both take the type's default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ModelAnalysis {
    #[serde(deserialize_with = "null_as_default")]
    recommendations: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    possible_conditions: Vec<ModelCondition>,
    #[serde(deserialize_with = "null_as_default")]
    supportive_message: String,
    #[serde(deserialize_with = "null_as_default")]
    has_symptoms: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelCondition {
    #[serde(deserialize_with = "null_as_default")]
    condition: String,
    #[serde(deserialize_with = "null_as_default")]
    description: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Asks the model and converts its reply into an [`Analysis`].
///
/// The risk level is derived here, never taken from the model.
pub async fn analyze_with_model(
    generator: &dyn TextGenerator,
    responses: &Responses,
) -> Result<Analysis, RemoteAnalysisError> {
    let prompt = build_user_prompt(responses).map_err(RemoteAnalysisError::Prompt)?;
    let raw = generator.generate(SYSTEM_POLICY, &prompt).await?;
    debug!(output_len = raw.len(), "model replied");
    parse_model_output(&raw)
}

/// Converts raw model text into an [`Analysis`].
pub fn parse_model_output(raw: &str) -> Result<Analysis, RemoteAnalysisError> {
    let parsed: ModelAnalysis = extract_first_object(raw)?;

    let risk_level = if parsed.has_symptoms {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    Ok(Analysis {
        risk_level,
        recommendations: parsed.recommendations,
        possible_conditions: parsed
            .possible_conditions
            .into_iter()
            .map(|c| PossibleCondition::new(c.condition, c.description))
            .collect(),
        has_symptoms: parsed.has_symptoms,
        ai_message: parsed.supportive_message,
        analyzed_by_ai: true,
        ai_error: None,
    })
}
