use std::sync::Arc;

use axum::extract::{Json, Path, State};
use services::uuid::parse_session_id;
use tracing::{debug, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::report::report_response::ReportResponse,
};

/// Fetches a stored, unexpired report by session id.
#[instrument(name = "report_route", skip(state))]
pub async fn report_route(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> AppResult<Json<ReportResponse>> {
    let id = parse_session_id(&session_id)
        .ok_or_else(|| AppError::BadRequest("session id must be a UUID".into()))?;

    let report = state.store.get(id).await?.ok_or(AppError::NotFound)?;
    debug!(%id, "report found");
    Ok(Json(report.into()))
}
