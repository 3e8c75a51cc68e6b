use serde::Serialize;
use symptom_analyzer::{Analysis, ReferenceImageTag};
use uuid::Uuid;

/// Response body of `POST /analyze`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Fresh id for this assessment, whether or not the report was stored.
    pub session_id: Uuid,
    #[serde(flatten)]
    pub analysis: Analysis,
    /// Known tags from the request, in request order. Unknown or non-string
    /// entries are dropped, so this can be shorter than what was sent.
    pub selected_reference_images: Vec<ReferenceImageTag>,
}
