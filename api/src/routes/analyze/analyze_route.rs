use std::sync::Arc;

use axum::{
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;
use services::uuid::new_session_id;
use symptom_analyzer::SymptomReport;
use tracing::{error, info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::analyze::{analyze_request::AnalyzeRequest, analyze_response::AnalyzeResponse},
};

/// Runs one anonymous assessment.
///
/// The report is stored best-effort: a store failure is logged and the
/// caller still gets the analysis with its session id.
#[instrument(name = "analyze_route", skip_all, fields(store = state.store.kind()))]
pub async fn analyze_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AnalyzeResponse>)> {
    let Json(body) = payload?;
    let (responses, images) = body.into_parts()?;

    let analysis = state.analyzer.analyze(&responses, &images).await;
    let session_id = new_session_id();

    let report = SymptomReport::assemble(
        session_id,
        responses,
        &analysis,
        images.clone(),
        Utc::now(),
        state.config.report_ttl,
    );
    if let Err(err) = state.store.insert(report).await {
        error!(%session_id, error = %err, "failed to persist symptom report");
    }

    info!(
        %session_id,
        risk_level = analysis.risk_level.as_str(),
        analyzed_by_ai = analysis.analyzed_by_ai,
        "assessment completed"
    );

    Ok((
        StatusCode::CREATED,
        Json(AnalyzeResponse {
            session_id,
            analysis,
            selected_reference_images: images,
        }),
    ))
}
