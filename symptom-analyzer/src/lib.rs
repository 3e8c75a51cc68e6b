//! Symptom questionnaire, risk analysis and report model.
//!
//! [`SymptomAnalyzer`] is the only entry point the HTTP layer needs; it picks
//! between the model-backed path and the deterministic rules.

pub mod analyzer;
pub mod catalog;
pub mod fallback;
pub mod json_extract;
pub mod prompt;
pub mod remote;
pub mod types;

pub use analyzer::{AnalyzerConfig, SymptomAnalyzer};
pub use remote::{RemoteAnalysisError, TextGenerator};
pub use types::{
    Analysis, PossibleCondition, REPORT_TTL_DAYS, ReferenceImageTag, Responses, RiskLevel,
    SymptomReport,
};
