use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether model-backed analysis is configured.
    pub ai_enabled: bool,
    /// Report store backend name.
    pub store: &'static str,
}

pub async fn health_route(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        ai_enabled: state.analyzer.remote_enabled(),
        store: state.store.kind(),
    })
}
