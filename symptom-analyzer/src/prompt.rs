//! Prompt builder for the model path.

use crate::types::Responses;

/// Tone and safety policy sent as the system part of the request.
pub const SYSTEM_POLICY: &str = r#"
You are a warm, non-judgemental sexual health educator helping an anonymous user understand their questionnaire answers.
Rules:
- Be reassuring and calm. Never use alarming language.
- Never diagnose. Talk about what symptoms "can be associated with", and always encourage seeing a healthcare provider for testing.
- Keep every recommendation short, practical and kind.
- Reply with a single JSON object and nothing else.
"#;

/// Builds the user prompt embedding the pretty-printed answers.
pub fn build_user_prompt(responses: &Responses) -> Result<String, serde_json::Error> {
    let answers = serde_json::to_string_pretty(responses)?;

    let mut out = String::with_capacity(answers.len() + 900);
    out.push_str("Questionnaire answers (question id -> answer):\n");
    out.push_str(&answers);
    out.push_str("\n\n");
    out.push_str(
        r#"Return exactly this JSON shape:
{
  "recommendations": ["3 to 5 short, supportive next steps"],
  "possibleConditions": [{"condition": "name", "description": "one or two plain-language sentences"}],
  "supportiveMessage": "two or three encouraging sentences addressed to the user",
  "hasSymptoms": true or false (whether the answers describe any current symptoms)
}
"#,
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn embeds_answers_and_schema() {
        let responses = match json!({"unusual_discharge": "Yes", "pain_symptoms": ["Pain during sex"]}) {
            serde_json::Value::Object(m) => m,
            _ => unreachable!(),
        };
        let prompt = build_user_prompt(&responses).unwrap();
        assert!(prompt.contains("\"unusual_discharge\": \"Yes\""));
        assert!(prompt.contains("\"Pain during sex\""));
        for field in ["recommendations", "possibleConditions", "supportiveMessage", "hasSymptoms"] {
            assert!(prompt.contains(field), "schema misses {field}");
        }
    }

    #[test]
    fn policy_forbids_diagnosis() {
        assert!(SYSTEM_POLICY.contains("Never diagnose"));
        assert!(SYSTEM_POLICY.contains("single JSON object"));
    }
}
