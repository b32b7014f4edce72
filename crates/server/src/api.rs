//! HTTP API: prediction, model metadata, health checks, Prometheus metrics
//!
//! The transport layer maps each core error kind onto a status code without
//! collapsing the distinction: invalid input is the caller's to fix (422),
//! a missing model is a service-availability condition (503), and everything
//! else is a server-side failure (500).

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prediction_lib::{
    AlgorithmKind, ComponentStatus, HealthRegistry, ModelRepository, ModelStore,
    PredictRevenueUseCase, PredictionError, PredictionMetrics, PredictionRequest,
    StructuredLogger,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use tracing::info;

/// Shared application state
pub struct AppState {
    pub use_case: PredictRevenueUseCase,
    pub repository: Arc<ModelRepository>,
    pub health_registry: HealthRegistry,
    pub metrics: PredictionMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        use_case: PredictRevenueUseCase,
        repository: Arc<ModelRepository>,
        health_registry: HealthRegistry,
        metrics: PredictionMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            use_case,
            repository,
            health_registry,
            metrics,
            logger,
        }
    }
}

/// Prediction response: core result plus an echo of the input values
#[derive(Debug, Serialize)]
struct PredictResponse {
    predicted_revenue: f64,
    model_used: AlgorithmKind,
    confidence_score: f32,
    experience_months: Option<f64>,
    number_of_sales: Option<f64>,
    seasonal_factor: Option<f64>,
}

#[derive(Debug, Serialize)]
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

/// POST /api/v1/predict
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictionRequest>,
) -> impl IntoResponse {
    let start = Instant::now();

    match state.use_case.execute(&request) {
        Ok(result) => {
            let latency = start.elapsed().as_secs_f64();
            state.metrics.inc_predictions();
            state.metrics.observe_prediction_latency(latency);
            state.logger.log_prediction(&result, latency);

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
            state.logger.log_prediction_error(err.code(), &err.to_string());
            error_response(&err).into_response()
        }
    }
}

/// GET /api/v1/model/info
async fn model_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.use_case.describe_model() {
        Ok(description) => (StatusCode::OK, Json(description)).into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

/// POST /api/v1/model/reload
async fn model_reload(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let old_version = state
        .repository
        .current()
        .map(|artifact| artifact.version.clone())
        .unwrap_or_default();

    match state.repository.reload() {
        Ok(artifact) => {
            state.metrics.set_model_info(
                &artifact.version,
                &artifact.algorithm.to_string(),
                artifact.r2,
            );
            state
                .logger
                .log_model_reloaded(&old_version, &artifact.version);
            (StatusCode::OK, Json(artifact.describe())).into_response()
        }
        Err(err) => {
            state.logger.log_reload_failed(&err.to_string());
            error_response(&PredictionError::ModelLoad(err)).into_response()
        }
    }
}

/// Health check response - 200 while operational, 503 once unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health();

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still operational
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - 200 once the model is resident
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness();

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            err.to_string().into_bytes(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/predict", post(predict))
        .route("/api/v1/model/info", get(model_info))
        .route("/api/v1/model/reload", post(model_reload))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
