//! Observability infrastructure for the prediction service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, request/error counters, model info)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge, register_gauge_vec, register_histogram, register_int_counter,
    register_int_counter_vec, Gauge, GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::models::{ModelDescription, PredictionResult};

/// Histogram buckets for prediction latency (seconds); inference is pure
/// arithmetic so the scale is sub-millisecond.
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictionMetricsInner> = OnceLock::new();

struct PredictionMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    prediction_errors_total: IntCounterVec,
    model_info: GaugeVec,
    model_r2: Gauge,
}

impl PredictionMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "revenue_predictor_prediction_latency_seconds",
                "Time spent serving one prediction request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "revenue_predictor_predictions_total",
                "Total number of predictions served"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter_vec!(
                "revenue_predictor_prediction_errors_total",
                "Total number of failed prediction requests by error code",
                &["code"]
            )
            .expect("Failed to register prediction_errors_total"),

            model_info: register_gauge_vec!(
                "revenue_predictor_model_info",
                "Information about the currently loaded model artifact",
                &["version", "algorithm"]
            )
            .expect("Failed to register model_info"),

            model_r2: register_gauge!(
                "revenue_predictor_model_r2",
                "Training-time R² of the currently loaded model artifact"
            )
            .expect("Failed to register model_r2"),
        }
    }
}

/// Metrics handle for Prometheus exposition.
///
/// A lightweight handle to the global metrics instance; clones share the
/// same underlying metrics.
#[derive(Clone)]
pub struct PredictionMetrics {
    _private: (),
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictionMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictionMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner()
            .prediction_latency_seconds
            .observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn inc_prediction_errors(&self, code: &str) {
        self.inner()
            .prediction_errors_total
            .with_label_values(&[code])
            .inc();
    }

    /// Record the resident model; resets the previous version's series.
    pub fn set_model_info(&self, version: &str, algorithm: &str, r2: f64) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[version, algorithm])
            .set(1.0);
        self.inner().model_r2.set(r2);
    }
}

/// Structured logger for service events.
///
/// Emits consistent JSON-formatted events for startup, predictions, and
/// model lifecycle changes.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, model_version: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            service_version = %version,
            model_version = %model_version,
            "Prediction service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Prediction service shutting down"
        );
    }

    pub fn log_prediction(&self, result: &PredictionResult, latency_secs: f64) {
        info!(
            event = "prediction_served",
            service = %self.service,
            predicted_revenue = result.predicted_revenue,
            model_used = %result.model_used,
            confidence_score = result.confidence_score,
            latency_secs = latency_secs,
            "Served revenue prediction"
        );
    }

    pub fn log_prediction_error(&self, code: &str, detail: &str) {
        warn!(
            event = "prediction_failed",
            service = %self.service,
            code = %code,
            detail = %detail,
            "Prediction request failed"
        );
    }

    pub fn log_model_loaded(&self, description: &ModelDescription) {
        info!(
            event = "model_loaded",
            service = %self.service,
            model_version = %description.version,
            algorithm = %description.algorithm,
            r2 = description.r2,
            sha256 = %description.artifact_sha256,
            "Model artifact loaded"
        );
    }

    pub fn log_model_reloaded(&self, old_version: &str, new_version: &str) {
        info!(
            event = "model_reloaded",
            service = %self.service,
            old_version = %old_version,
            new_version = %new_version,
            "Model artifact replaced"
        );
    }

    pub fn log_reload_failed(&self, detail: &str) {
        warn!(
            event = "model_reload_failed",
            service = %self.service,
            detail = %detail,
            "Model reload failed, previous artifact stays resident"
        );
    }
}
