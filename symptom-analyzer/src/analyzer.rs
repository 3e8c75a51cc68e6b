use std::sync::Arc;

use ai_llm_service::{AiLlmError, LlmClient, LlmModelConfig};
use tracing::{info, instrument, warn};

use crate::{
    fallback::{self, FallbackAssessment},
    remote::{TextGenerator, analyze_with_model},
    types::{Analysis, ReferenceImageTag, Responses},
};

/// Analyzer wiring. `remote: None` keeps every request on the rule-based path.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub remote: Option<LlmModelConfig>,
}

/// Entry point for one assessment.
///
/// Never fails: model problems end up in [`Analysis::ai_error`].
#[derive(Clone)]
pub struct SymptomAnalyzer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl std::fmt::Debug for SymptomAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymptomAnalyzer")
            .field("remote_enabled", &self.remote_enabled())
            .finish()
    }
}

impl SymptomAnalyzer {
    pub fn new(cfg: AnalyzerConfig) -> Result<Self, AiLlmError> {
        let generator = match cfg.remote {
            Some(remote) => {
                let client = LlmClient::from_config(remote)?;
                info!(provider = %client.provider(), "model-backed analysis enabled");
                Some(Arc::new(client) as Arc<dyn TextGenerator>)
            }
            None => {
                info!("no model credentials configured, using rule-based analysis only");
                None
            }
        };
        Ok(Self { generator })
    }

    pub fn fallback_only() -> Self {
        Self { generator: None }
    }

    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    pub fn remote_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Analyzes one questionnaire.
    ///
    /// Tries the model once when configured; any failure switches to the
    /// rule-based result in full.
    #[instrument(name = "symptom_analyzer.analyze", skip_all, fields(answers = responses.len(), images = images.len()))]
    pub async fn analyze(&self, responses: &Responses, images: &[ReferenceImageTag]) -> Analysis {
        let Some(generator) = &self.generator else {
            return from_fallback(fallback::assess(responses, images), None);
        };

        match analyze_with_model(generator.as_ref(), responses).await {
            Ok(analysis) => {
                info!(risk_level = analysis.risk_level.as_str(), "model analysis accepted");
                analysis
            }
            Err(err) => {
                warn!(error = %err, "model analysis failed, using rule-based result");
                from_fallback(fallback::assess(responses, images), Some(err.to_string()))
            }
        }
    }
}

fn from_fallback(assessment: FallbackAssessment, ai_error: Option<String>) -> Analysis {
    Analysis {
        risk_level: assessment.risk_level,
        recommendations: assessment.recommendations,
        possible_conditions: assessment.possible_conditions,
        has_symptoms: assessment.has_symptoms,
        ai_message: String::new(),
        analyzed_by_ai: false,
        ai_error,
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use serde_json::{Value, json};

    use super::*;
    use crate::{remote::GenerateFuture, types::RiskLevel};

    struct Canned {
        reply: Result<String, fn() -> AiLlmError>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(err: fn() -> AiLlmError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl TextGenerator for Canned {
        fn generate<'a>(&'a self, _system: &'a str, _prompt: &'a str) -> GenerateFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            };
            Box::pin(async move { reply })
        }
    }

    fn responses(v: Value) -> Responses {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    fn symptomatic() -> Responses {
        responses(json!({
            "unusual_discharge": "Yes",
            "sores_or_bumps": "Yes",
            "pain_symptoms": ["Pain during sex", "Itching or irritation"],
        }))
    }

    #[tokio::test]
    async fn without_generator_runs_rules_silently() {
        let analyzer = SymptomAnalyzer::fallback_only();
        assert!(!analyzer.remote_enabled());

        let a = analyzer.analyze(&symptomatic(), &[ReferenceImageTag::Herpes]).await;
        let expected = fallback::assess(&symptomatic(), &[ReferenceImageTag::Herpes]);
        assert_eq!(a.risk_level, expected.risk_level);
        assert_eq!(a.recommendations, expected.recommendations);
        assert_eq!(a.possible_conditions, expected.possible_conditions);
        assert!(!a.analyzed_by_ai);
        assert!(a.ai_error.is_none());
        assert_eq!(a.ai_message, "");
    }

    #[tokio::test]
    async fn model_answer_is_used() {
        let generator = Canned::ok(
            r#"```json
{"recommendations": ["Visit a clinic"], "possibleConditions": [], "supportiveMessage": "You are doing the right thing.", "hasSymptoms": true}
```"#,
        );
        let analyzer = SymptomAnalyzer::with_generator(generator.clone());

        let a = analyzer.analyze(&symptomatic(), &[]).await;
        assert!(a.analyzed_by_ai);
        assert_eq!(a.risk_level, RiskLevel::Medium);
        assert_eq!(a.recommendations, vec!["Visit a clinic".to_string()]);
        assert_eq!(a.ai_message, "You are doing the right thing.");
        assert!(a.ai_error.is_none());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn truncated_model_output_matches_rules_exactly() {
        let generator = Canned::ok("{");
        let analyzer = SymptomAnalyzer::with_generator(generator.clone());
        let images = [ReferenceImageTag::Warts, ReferenceImageTag::Clear];

        let a = analyzer.analyze(&symptomatic(), &images).await;
        let expected = fallback::assess(&symptomatic(), &images);
        assert_eq!(a.risk_level, expected.risk_level);
        assert_eq!(a.recommendations, expected.recommendations);
        assert_eq!(a.possible_conditions, expected.possible_conditions);
        assert_eq!(a.has_symptoms, expected.has_symptoms);
        assert!(!a.analyzed_by_ai);
        assert_eq!(a.ai_message, "");
        assert!(a.ai_error.as_deref().unwrap_or_default().contains("never closed"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_not_retried() {
        let generator = Canned::failing(|| AiLlmError::Timeout(Duration::from_secs(20)));
        let analyzer = SymptomAnalyzer::with_generator(generator.clone());

        let a = analyzer.analyze(&Responses::new(), &[]).await;
        assert!(!a.analyzed_by_ai);
        assert_eq!(a.risk_level, RiskLevel::Low);
        assert!(a.ai_error.is_some());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn new_without_remote_is_fallback_only() {
        let analyzer = SymptomAnalyzer::new(AnalyzerConfig::default()).unwrap();
        assert!(!analyzer.remote_enabled());
    }
}
