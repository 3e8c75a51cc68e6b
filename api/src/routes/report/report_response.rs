use chrono::{DateTime, Utc};
use serde::Serialize;
use symptom_analyzer::{PossibleCondition, ReferenceImageTag, RiskLevel, SymptomReport};
use uuid::Uuid;

/// Stored report as returned by `GET /reports/{sessionId}`.
///
/// The raw questionnaire answers are never sent back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub session_id: Uuid,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub possible_conditions: Vec<PossibleCondition>,
    pub has_symptoms: bool,
    pub selected_reference_images: Vec<ReferenceImageTag>,
    #[serde(rename = "analyzedByAI")]
    pub analyzed_by_ai: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<SymptomReport> for ReportResponse {
    fn from(r: SymptomReport) -> Self {
        Self {
            session_id: r.session_id,
            risk_level: r.risk_level,
            recommendations: r.recommendations,
            possible_conditions: r.possible_conditions,
            has_symptoms: r.has_symptoms,
            selected_reference_images: r.selected_reference_images,
            analyzed_by_ai: r.analyzed_by_ai,
            ai_message: r.ai_message,
            created_at: r.created_at,
            expires_at: r.expires_at,
        }
    }
}
