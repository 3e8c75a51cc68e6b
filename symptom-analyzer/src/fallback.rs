//! Rule-based analysis used whenever the model path is off or fails.
//!
//! The risk score and the `has_symptoms` flag are computed independently:
//! a low score can still report symptoms.

use serde_json::Value;

use crate::{
    catalog::{
        DISCHARGE_FIELD, FLU_LIKE_FIELD, LAST_TESTED_FIELD, NEVER_TESTED, NONE_OF_THESE,
        PAIN_FIELD, POSITIVE_ANSWERS, SORES_FIELD, YES,
    },
    types::{PossibleCondition, ReferenceImageTag, Responses, RiskLevel},
};

/// Highest score still classified as low risk.
pub const LOW_RISK_MAX: u32 = 2;
/// Highest score still classified as medium risk.
pub const MEDIUM_RISK_MAX: u32 = 5;

const DISCHARGE_WEIGHT: u32 = 2;
const SORES_WEIGHT: u32 = 2;
const FLU_LIKE_WEIGHT: u32 = 1;
const NEVER_TESTED_WEIGHT: u32 = 1;

const SYMPTOMATIC_LEAD: [&str; 3] = [
    "Book an appointment with a healthcare provider or sexual health clinic so someone can take a proper look.",
    "Avoid sexual contact, or use condoms every time, until you have been checked.",
    "Note down your symptoms and when they started so you can share them at your appointment.",
];

const ROUTINE_LEAD: [&str; 3] = [
    "Keep up with regular STI testing, at least once a year or whenever you have a new partner.",
    "Use condoms or other barrier protection to lower your risk.",
    "Talk openly with your partners about testing and sexual health.",
];

const CLOSING: [&str; 2] = [
    "Most sexual health conditions are common and very treatable, especially when found early.",
    "This check gives general information only and is not a medical diagnosis.",
];

/// Output of the rule-based path.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackAssessment {
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
    pub possible_conditions: Vec<PossibleCondition>,
    pub has_symptoms: bool,
}

/// Runs the full rule set. Total and deterministic for any input.
pub fn assess(responses: &Responses, images: &[ReferenceImageTag]) -> FallbackAssessment {
    let has_symptoms = has_symptoms(responses);
    FallbackAssessment {
        risk_level: classify(risk_score(responses)),
        recommendations: recommendations(has_symptoms),
        possible_conditions: possible_conditions(images, has_symptoms),
        has_symptoms,
    }
}

/// Weighted sum over the scoring fields. Missing or oddly-shaped fields add nothing.
pub fn risk_score(responses: &Responses) -> u32 {
    let mut score = 0u32;

    if answer_is(responses, DISCHARGE_FIELD, YES) {
        score += DISCHARGE_WEIGHT;
    }
    if answer_is(responses, SORES_FIELD, YES) {
        score += SORES_WEIGHT;
    }
    if let Some(Value::Array(pain)) = responses.get(PAIN_FIELD) {
        score = score.saturating_add(u32::try_from(pain.len()).unwrap_or(u32::MAX));
    }
    if matches!(responses.get(FLU_LIKE_FIELD), Some(Value::Array(flu)) if !flu.is_empty()) {
        score += FLU_LIKE_WEIGHT;
    }
    if answer_is(responses, LAST_TESTED_FIELD, NEVER_TESTED) {
        score += NEVER_TESTED_WEIGHT;
    }

    score
}

pub fn classify(score: u32) -> RiskLevel {
    match score {
        s if s <= LOW_RISK_MAX => RiskLevel::Low,
        s if s <= MEDIUM_RISK_MAX => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

/// True if any answer is a positive sentinel, or a non-empty list that does
/// not start with [`NONE_OF_THESE`].
pub fn has_symptoms(responses: &Responses) -> bool {
    responses.values().any(|value| match value {
        Value::String(s) => POSITIVE_ANSWERS.contains(&s.as_str()),
        Value::Array(items) => items
            .first()
            .is_some_and(|first| first.as_str() != Some(NONE_OF_THESE)),
        _ => false,
    })
}

pub fn recommendations(has_symptoms: bool) -> Vec<String> {
    let lead = if has_symptoms {
        SYMPTOMATIC_LEAD
    } else {
        ROUTINE_LEAD
    };
    lead.iter()
        .chain(CLOSING.iter())
        .map(|s| s.to_string())
        .collect()
}

/// Maps selected pictures to conditions in input order; falls back to one
/// default entry when nothing maps.
pub fn possible_conditions(
    images: &[ReferenceImageTag],
    has_symptoms: bool,
) -> Vec<PossibleCondition> {
    let mut out: Vec<PossibleCondition> = images.iter().filter_map(|t| condition_for(*t)).collect();

    if out.is_empty() {
        out.push(if has_symptoms {
            PossibleCondition::new(
                "Consult a Healthcare Provider",
                "Your answers mention symptoms that are worth having checked. A clinician can examine you and suggest the right tests.",
            )
        } else {
            PossibleCondition::new(
                "Routine Sexual Health Maintenance",
                "Nothing you shared points to a specific concern. Regular testing and protection are the best ways to stay healthy.",
            )
        });
    }

    out
}

fn condition_for(tag: ReferenceImageTag) -> Option<PossibleCondition> {
    let (condition, description) = match tag {
        ReferenceImageTag::Herpes => (
            "Genital Herpes (HSV)",
            "A common viral infection that can cause small blisters or sores. Outbreaks can be managed well with treatment.",
        ),
        ReferenceImageTag::Warts => (
            "Genital Warts (HPV)",
            "Small bumps caused by a very common virus. They are usually harmless and can be treated or removed.",
        ),
        ReferenceImageTag::Scabies => (
            "Scabies",
            "An itchy skin condition caused by tiny mites. It spreads through close contact and is easily treated with creams.",
        ),
        ReferenceImageTag::Ulcer => (
            "Genital Ulcer (e.g. Syphilis or Chancroid)",
            "An open sore can have several causes, some bacterial. A simple test can tell them apart and they are curable with antibiotics.",
        ),
        _ => return None,
    };
    Some(PossibleCondition::new(condition, description))
}

fn answer_is(responses: &Responses, field: &str, expected: &str) -> bool {
    responses.get(field).and_then(Value::as_str) == Some(expected)
}
