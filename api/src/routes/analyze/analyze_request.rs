use serde::Deserialize;
use serde_json::Value;
use symptom_analyzer::{ReferenceImageTag, Responses};
use tracing::warn;

use crate::error_handler::AppError;

/// Request body for `POST /analyze`.
///
/// Both fields are taken as raw JSON and checked by hand, so a wrong
/// `responses` shape is a 400 and a wrong image list is simply ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Question id -> answer (string or list of strings).
    #[serde(default)]
    pub responses: Option<Value>,
    /// Reference image tags picked by the user.
    #[serde(default)]
    pub selected_reference_images: Value,
}

impl AnalyzeRequest {
    /// Validates the body and splits it into answers and known image tags.
    pub fn into_parts(self) -> Result<(Responses, Vec<ReferenceImageTag>), AppError> {
        let responses = match self.responses {
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(AppError::BadRequest("`responses` must be a JSON object".into()));
            }
            None => return Err(AppError::BadRequest("`responses` is required".into())),
        };

        Ok((responses, image_tags(&self.selected_reference_images)))
    }
}

fn image_tags(raw: &Value) -> Vec<ReferenceImageTag> {
    let Value::Array(items) = raw else {
        if !raw.is_null() {
            warn!("selectedReferenceImages is not an array, ignoring it");
        }
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let tag = item.as_str().and_then(ReferenceImageTag::from_tag);
            if tag.is_none() {
                warn!(value = %item, "dropping unknown reference image tag");
            }
            tag
        })
        .collect()
}
