//! Data model shared by the analyzer, the report store and the HTTP layer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Questionnaire answers keyed by question id.
///
/// Values are whatever the frontend sends: a string, a list of strings or a
/// nested object of selections. No schema is enforced.
pub type Responses = Map<String, Value>;

/// How long a stored report stays visible.
pub const REPORT_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossibleCondition {
    pub condition: String,
    pub description: String,
}

impl PossibleCondition {
    pub fn new(condition: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            description: description.into(),
        }
    }
}

/// Tags of the reference pictures a user can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceImageTag {
    Herpes,
    Warts,
    Yeast,
    Scabies,
    Ulcer,
    Clear,
    Acne,
    Patchy,
    Rash,
    Blisters,
    Dry,
}

impl ReferenceImageTag {
    pub const ALL: [ReferenceImageTag; 11] = [
        ReferenceImageTag::Herpes,
        ReferenceImageTag::Warts,
        ReferenceImageTag::Yeast,
        ReferenceImageTag::Scabies,
        ReferenceImageTag::Ulcer,
        ReferenceImageTag::Clear,
        ReferenceImageTag::Acne,
        ReferenceImageTag::Patchy,
        ReferenceImageTag::Rash,
        ReferenceImageTag::Blisters,
        ReferenceImageTag::Dry,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceImageTag::Herpes => "herpes",
            ReferenceImageTag::Warts => "warts",
            ReferenceImageTag::Yeast => "yeast",
            ReferenceImageTag::Scabies => "scabies",
            ReferenceImageTag::Ulcer => "ulcer",
            ReferenceImageTag::Clear => "clear",
            ReferenceImageTag::Acne => "acne",
            ReferenceImageTag::Patchy => "patchy",
            ReferenceImageTag::Rash => "rash",
            ReferenceImageTag::Blisters => "blisters",
            ReferenceImageTag::Dry => "dry",
        }
    }

    /// Exact, case-sensitive tag lookup.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

/// Outcome of one analysis, whichever path produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub possible_conditions: Vec<PossibleCondition>,
    pub has_symptoms: bool,
    /// Supportive message from the model; empty on the rule-based path.
    pub ai_message: String,
    #[serde(rename = "analyzedByAI")]
    pub analyzed_by_ai: bool,
    /// Why the model answer was not used, when a model call was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_error: Option<String>,
}

/// One persisted assessment. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomReport {
    pub session_id: Uuid,
    pub responses: Responses,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub possible_conditions: Vec<PossibleCondition>,
    pub has_symptoms: bool,
    pub selected_reference_images: Vec<ReferenceImageTag>,
    #[serde(rename = "analyzedByAI")]
    pub analyzed_by_ai: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SymptomReport {
    /// Assembles a report from an analysis, expiring `ttl` after `created_at`.
    pub fn assemble(
        session_id: Uuid,
        responses: Responses,
        analysis: &Analysis,
        selected_reference_images: Vec<ReferenceImageTag>,
        created_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let ai_message = if analysis.ai_message.is_empty() {
            None
        } else {
            Some(analysis.ai_message.clone())
        };

        Self {
            session_id,
            responses,
            risk_level: analysis.risk_level,
            recommendations: analysis.recommendations.clone(),
            possible_conditions: analysis.possible_conditions.clone(),
            has_symptoms: analysis.has_symptoms,
            selected_reference_images,
            analyzed_by_ai: analysis.analyzed_by_ai,
            ai_message,
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
