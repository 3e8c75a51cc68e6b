use axum::Json;
use symptom_analyzer::catalog::{self, Question, ReferenceImage};

/// `GET /questions`: the questionnaire in display order.
pub async fn questions_route() -> Json<&'static [Question]> {
    Json(catalog::questions())
}

/// `GET /reference-images`
pub async fn reference_images_route() -> Json<&'static [ReferenceImage]> {
    Json(catalog::reference_images())
}
