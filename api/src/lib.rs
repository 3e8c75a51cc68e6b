//! HTTP surface of the symptom checker.

use std::sync::Arc;

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use report_store::spawn_sweeper;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
};
use tracing::{error, info};

pub use crate::{
    core::{app_config::AppConfig, app_state::AppState},
    error_handler::AppError,
};
use crate::{
    middleware_layer::{panic_handler::panic_response, request_id::request_id},
    routes::{
        analyze::analyze_route::analyze_route,
        catalog_route::{questions_route, reference_images_route},
        health_route::health_route,
        report::report_route::report_route,
    },
};

/// Builds state from `config`, starts the report sweeper and serves until Ctrl+C.
pub async fn start(config: AppConfig) -> Result<(), AppError> {
    let address = config.address.clone();
    let sweep_interval = config.sweep_interval;

    let state = Arc::new(AppState::from_config(config).await?);
    let sweeper = spawn_sweeper(state.store.clone(), sweep_interval);
    info!(
        store = state.store.kind(),
        ai_enabled = state.analyzer.remote_enabled(),
        "application state ready"
    );

    let app = build_router(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "listening");

    // Start server with graceful shutdown on Ctrl+C
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server);

    sweeper.abort();
    info!("server stopped");
    served
}

/// All routes plus the request-id, panic and CORS layers.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state);

    Router::new()
        .route("/analyze", post(analyze_route))
        .route("/questions", get(questions_route))
        .route("/reference-images", get(reference_images_route))
        .route("/reports/{session_id}", get(report_route))
        .route("/health", get(health_route))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_id))
        .layer(cors)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match &state.config.cors_allow_origin {
        Some(origin) => cors.allow_origin(origin.clone()),
        None => cors.allow_origin(Any),
    }
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::{
        future::Future,
        path::PathBuf,
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use ai_llm_service::AiLlmError;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use report_store::{MemoryReportStore, ReportStore, ReportStoreError, StoreBackend};
    use serde_json::{Value, json};
    use symptom_analyzer::{
        AnalyzerConfig, SymptomAnalyzer, SymptomReport, TextGenerator, remote::GenerateFuture,
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            address: "127.0.0.1:0".into(),
            store: StoreBackend::Memory,
            report_ttl: chrono::Duration::days(30),
            sweep_interval: Duration::from_secs(3600),
            cors_allow_origin: None,
            analyzer: AnalyzerConfig::default(),
        }
    }

    fn app_with(analyzer: SymptomAnalyzer, store: Arc<dyn ReportStore>) -> Router {
        build_router(Arc::new(AppState::new(config(), analyzer, store)))
    }

    fn app() -> Router {
        app_with(SymptomAnalyzer::fallback_only(), Arc::new(MemoryReportStore::new()))
    }

    struct FailingStore;

    impl ReportStore for FailingStore {
        fn insert<'a>(
            &'a self,
            _report: SymptomReport,
        ) -> std::pin::Pin<Box<dyn Future<Output = Result<(), ReportStoreError>> + Send + 'a>>
        {
            Box::pin(async {
                Err(ReportStoreError::Io {
                    path: PathBuf::from("/unwritable"),
                    source: std::io::Error::other("disk full"),
                })
            })
        }

        fn get<'a>(
            &'a self,
            _session_id: Uuid,
        ) -> std::pin::Pin<
            Box<dyn Future<Output = Result<Option<SymptomReport>, ReportStoreError>> + Send + 'a>,
        > {
            Box::pin(async {
                Err(ReportStoreError::Io {
                    path: PathBuf::from("/unreadable"),
                    source: std::io::Error::other("disk gone"),
                })
            })
        }

        fn purge_expired<'a>(
            &'a self,
        ) -> std::pin::Pin<Box<dyn Future<Output = Result<usize, ReportStoreError>> + Send + 'a>>
        {
            Box::pin(async { Ok(0) })
        }

        fn kind(&self) -> &'static str {
            "failing"
        }
    }

    #[derive(Default)]
    struct CountingGenerator {
        calls: AtomicUsize,
    }

    impl TextGenerator for CountingGenerator {
        fn generate<'a>(&'a self, _system: &'a str, _prompt: &'a str) -> GenerateFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(AiLlmError::Timeout(Duration::from_secs(1))) })
        }
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn analyze_returns_created_with_session_id() {
        let res = app()
            .oneshot(post_json(
                "/analyze",
                &json!({
                    "responses": {"unusual_discharge": "Yes", "sores_or_bumps": "Yes"},
                    "selectedReferenceImages": ["herpes", "unknown"]
                })
                .to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(res.headers().contains_key(REQUEST_ID));
        let body = body_json(res).await;
        assert!(Uuid::parse_str(body["sessionId"].as_str().unwrap()).is_ok());
        assert_eq!(body["riskLevel"], "medium");
        assert_eq!(body["hasSymptoms"], true);
        assert_eq!(body["analyzedByAI"], false);
        assert_eq!(body["aiMessage"], "");
        assert_eq!(body["selectedReferenceImages"], json!(["herpes"]));
        assert!(body.get("aiError").is_none());
        assert!(
            body["possibleConditions"][0]["condition"]
                .as_str()
                .unwrap()
                .contains("Herpes")
        );
    }

    const REQUEST_ID: &str = "x-request-id";

    #[tokio::test]
    async fn bad_bodies_are_rejected_before_analysis() {
        let generator = Arc::new(CountingGenerator::default());
        let app = app_with(
            SymptomAnalyzer::with_generator(generator.clone()),
            Arc::new(MemoryReportStore::new()),
        );

        for body in [r#"{}"#, r#"{"responses": "Yes"}"#, "not json"] {
            let res = app.clone().oneshot(post_json("/analyze", body)).await.unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(body_json(res).await["error"], "BAD_REQUEST");
        }
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn model_failure_is_reported_not_surfaced() {
        let generator = Arc::new(CountingGenerator::default());
        let app = app_with(
            SymptomAnalyzer::with_generator(generator.clone()),
            Arc::new(MemoryReportStore::new()),
        );

        let res = app
            .oneshot(post_json("/analyze", r#"{"responses": {}}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body = body_json(res).await;
        assert_eq!(body["analyzedByAI"], false);
        assert!(body["aiError"].as_str().is_some());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn store_failure_still_returns_fresh_ids() {
        let app = app_with(SymptomAnalyzer::fallback_only(), Arc::new(FailingStore));

        let mut ids = Vec::new();
        for _ in 0..2 {
            let res = app
                .clone()
                .oneshot(post_json("/analyze", r#"{"responses": {"last_tested": "Never tested"}}"#))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::CREATED);
            ids.push(body_json(res).await["sessionId"].as_str().unwrap().to_string());
        }
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn stored_report_can_be_fetched_without_answers() {
        let app = app();
        let res = app
            .clone()
            .oneshot(post_json(
                "/analyze",
                r#"{"responses": {"pain_symptoms": ["Pain during sex"]}, "selectedReferenceImages": ["warts"]}"#,
            ))
            .await
            .unwrap();
        let id = body_json(res).await["sessionId"].as_str().unwrap().to_string();

        let res = app.oneshot(get_req(&format!("/reports/{id}"))).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["sessionId"], id.as_str());
        assert_eq!(body["selectedReferenceImages"], json!(["warts"]));
        assert!(body.get("responses").is_none());
        assert!(body["expiresAt"].is_string());
    }

    #[tokio::test]
    async fn report_lookup_errors() {
        let res = app()
            .oneshot(get_req(&format!("/reports/{}", Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = app().oneshot(get_req("/reports/not-a-uuid")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let failing = app_with(SymptomAnalyzer::fallback_only(), Arc::new(FailingStore));
        let res = failing
            .oneshot(get_req(&format!("/reports/{}", Uuid::new_v4())))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn catalogs_are_served() {
        let res = app().oneshot(get_req("/questions")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let questions = body_json(res).await;
        assert!(
            questions
                .as_array()
                .unwrap()
                .iter()
                .any(|q| q["id"] == "pain_symptoms")
        );

        let res = app().oneshot(get_req("/reference-images")).await.unwrap();
        let images = body_json(res).await;
        assert_eq!(images.as_array().unwrap().len(), 11);
        assert_eq!(images[0]["id"], "herpes");
    }

    #[tokio::test]
    async fn health_reports_wiring() {
        let analyzer = SymptomAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let res = app_with(analyzer, Arc::new(MemoryReportStore::new()))
            .oneshot(get_req("/health"))
            .await
            .unwrap();
        let body = body_json(res).await;
        assert_eq!(body, json!({"status": "ok", "aiEnabled": false, "store": "memory"}));
    }

    #[tokio::test]
    async fn request_id_is_propagated() {
        let req = Request::builder()
            .uri("/health")
            .header(REQUEST_ID, "trace-42")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.headers()[REQUEST_ID], "trace-42");
    }

    async fn boom() -> &'static str {
        panic!("kaboom")
    }

    #[tokio::test]
    async fn panics_become_json_500() {
        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(panic_response));
        let res = app.oneshot(get_req("/boom")).await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await["error"], "INTERNAL_ERROR");
    }
}
