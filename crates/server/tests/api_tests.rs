//! Integration tests for the prediction API endpoints

use std::io::Write;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prediction_lib::{
    AlgorithmKind, ComponentStatus, HealthRegistry, ModelRepository, ModelStore,
    PredictRevenueUseCase, PredictionError, PredictionMetrics, PredictionRequest,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use tempfile::NamedTempFile;
use tower::ServiceExt;

struct AppState {
    use_case: PredictRevenueUseCase,
    repository: Arc<ModelRepository>,
    health_registry: HealthRegistry,
    metrics: PredictionMetrics,
}

#[derive(Serialize)]
struct PredictResponse {
    predicted_revenue: f64,
    model_used: AlgorithmKind,
    confidence_score: f32,
    experience_months: Option<f64>,
    number_of_sales: Option<f64>,
    seasonal_factor: Option<f64>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

fn error_response(err: &PredictionError) -> (StatusCode, Json<ErrorBody>) {
    let status = match err {
        PredictionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PredictionError::ModelNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        PredictionError::ModelLoad(_) | PredictionError::Inference(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
            code: err.code(),
        }),
    )
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictionRequest>,
) -> impl IntoResponse {
    match state.use_case.execute(&request) {
        Ok(result) => {
            state.metrics.inc_predictions();
            (
                StatusCode::OK,
                Json(PredictResponse {
                    predicted_revenue: result.predicted_revenue,
                    model_used: result.model_used,
                    confidence_score: result.confidence_score,
                    experience_months: request.experience_months,
                    number_of_sales: request.number_of_sales,
                    seasonal_factor: request.seasonal_factor,
                }),
            )
                .into_response()
        }
        Err(err) => {
            state.metrics.inc_prediction_errors(err.code());
            error_response(&err).into_response()
        }
    }
}

async fn model_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.use_case.describe_model() {
        Ok(description) => (StatusCode::OK, Json(description)).into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

async fn model_reload(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.repository.reload() {
        Ok(artifact) => (StatusCode::OK, Json(artifact.describe())).into_response(),
        Err(err) => error_response(&PredictionError::ModelLoad(err)).into_response(),
    }
}

async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health();
    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness();
    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(readiness))
}

async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/predict", post(predict))
        .route("/api/v1/model/info", get(model_info))
        .route("/api/v1/model/reload", post(model_reload))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

fn artifact_json(version: &str) -> String {
    serde_json::json!({
        "algorithm": "linear",
        "degree": 1,
        "feature_names": ["experience_months", "number_of_sales", "seasonal_factor"],
        "coefficients": [45.0, 80.0, 150.0],
        "intercept": 1200.0,
        "r2": 0.91,
        "version": version,
        "trained_at": "2026-07-15T12:00:00Z",
    })
    .to_string()
}

fn write_artifact(version: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(artifact_json(version).as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Test app with a loaded linear model. The artifact file handle must stay
/// alive for reload tests.
fn setup_loaded_app() -> (Router, Arc<AppState>, NamedTempFile) {
    let file = write_artifact("v1.0.0");
    let repository = Arc::new(ModelRepository::new(file.path()));
    repository.load().unwrap();

    let health_registry = HealthRegistry::new();
    health_registry.register(prediction_lib::health::components::MODEL_REPOSITORY);
    health_registry.register(prediction_lib::health::components::PREDICTOR);
    health_registry.set_ready(true);

    let state = Arc::new(AppState {
        use_case: PredictRevenueUseCase::with_default_engine(repository.clone()),
        repository,
        health_registry,
        metrics: PredictionMetrics::new(),
    });
    (create_test_router(state.clone()), state, file)
}

/// Test app where load was never called.
fn setup_unloaded_app() -> (Router, Arc<AppState>) {
    let repository = Arc::new(ModelRepository::new("/nonexistent/model.json"));
    let state = Arc::new(AppState {
        use_case: PredictRevenueUseCase::with_default_engine(repository.clone()),
        repository,
        health_registry: HealthRegistry::new(),
        metrics: PredictionMetrics::new(),
    });
    (create_test_router(state.clone()), state)
}

fn predict_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_predict_returns_result_for_valid_input() {
    let (app, _state, _file) = setup_loaded_app();

    let response = app
        .oneshot(predict_request(serde_json::json!({
            "experience_months": 36,
            "number_of_sales": 50,
            "seasonal_factor": 7
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    // 1200 + 45*36 + 80*50 + 150*7 = 7870
    assert_eq!(body["predicted_revenue"], 7870.0);
    assert_eq!(body["model_used"], "linear");
    let confidence = body["confidence_score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));

    // Input values are echoed back
    assert_eq!(body["experience_months"], 36.0);
    assert_eq!(body["number_of_sales"], 50.0);
    assert_eq!(body["seasonal_factor"], 7.0);
}

#[tokio::test]
async fn test_predict_rejects_out_of_range_seasonal_factor() {
    let (app, _state, _file) = setup_loaded_app();

    let response = app
        .oneshot(predict_request(serde_json::json!({
            "experience_months": 36,
            "number_of_sales": 50,
            "seasonal_factor": 15
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn test_predict_rejects_missing_field() {
    let (app, _state, _file) = setup_loaded_app();

    let response = app
        .oneshot(predict_request(serde_json::json!({
            "experience_months": 36,
            "number_of_sales": 50
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("seasonal_factor is required"));
}

#[tokio::test]
async fn test_predict_rejects_negative_experience() {
    let (app, _state, _file) = setup_loaded_app();

    let response = app
        .oneshot(predict_request(serde_json::json!({
            "experience_months": -1,
            "number_of_sales": 50,
            "seasonal_factor": 7
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_predict_without_model_returns_503() {
    let (app, _state) = setup_unloaded_app();

    let response = app
        .oneshot(predict_request(serde_json::json!({
            "experience_months": 36,
            "number_of_sales": 50,
            "seasonal_factor": 7
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["code"], "model_not_loaded");
}

#[tokio::test]
async fn test_model_info_matches_loaded_artifact() {
    let (app, _state, _file) = setup_loaded_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/model/info")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["algorithm"], "linear");
    assert_eq!(body["version"], "v1.0.0");
    assert_eq!(
        body["feature_names"],
        serde_json::json!(["experience_months", "number_of_sales", "seasonal_factor"])
    );
    assert_eq!(body["artifact_sha256"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_model_reload_swaps_version() {
    let (app, _state, file) = setup_loaded_app();

    std::fs::write(file.path(), artifact_json("v2.0.0")).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/model/reload")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["version"], "v2.0.0");
}

#[tokio::test]
async fn test_model_reload_failure_keeps_serving() {
    let (app, state, file) = setup_loaded_app();

    std::fs::write(file.path(), b"{ truncated").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/model/reload")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // Previous artifact still serves predictions
    assert_eq!(state.repository.current().unwrap().version, "v1.0.0");
    let response = app
        .oneshot(predict_request(serde_json::json!({
            "experience_months": 36,
            "number_of_sales": 50,
            "seasonal_factor": 7
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_healthz_returns_ok() {
    let (app, _state, _file) = setup_loaded_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["components"]["model_repository"].is_object());
}

#[tokio::test]
async fn test_readyz_reflects_model_lifecycle() {
    let (app, _state) = setup_unloaded_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let (app, _state, _file) = setup_loaded_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_prediction_metrics() {
    let (app, _state, _file) = setup_loaded_app();

    // Serve one prediction so counters exist
    let _ = app
        .clone()
        .oneshot(predict_request(serde_json::json!({
            "experience_months": 12,
            "number_of_sales": 10,
            "seasonal_factor": 5
        })))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("revenue_predictor_predictions_total"));
}
