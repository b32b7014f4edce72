//! Prediction API - sales revenue prediction service
//!
//! Loads the trained regression artifact at startup and serves predictions
//! over HTTP. A process that cannot load its model refuses to serve.

use std::sync::Arc;

use anyhow::{Context, Result};
use prediction_lib::{
    health::components, HealthRegistry, ModelRepository, PredictRevenueUseCase, PredictionMetrics,
    StructuredLogger,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVICE_NAME: &str = "prediction-api";
const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting prediction-api");

    // Load configuration
    let config = config::ServerConfig::load()?;
    info!(model_path = %config.model_path, port = config.api_port, "Service configured");

    // Initialize health registry
    let health_registry = HealthRegistry::new();
    health_registry.register(components::MODEL_REPOSITORY);
    health_registry.register(components::PREDICTOR);

    // Initialize metrics and structured logging
    let metrics = PredictionMetrics::new();
    let logger = StructuredLogger::new(SERVICE_NAME);

    // Load the model before binding; a load failure aborts startup
    let repository = Arc::new(ModelRepository::new(&config.model_path));
    let artifact = repository
        .load()
        .with_context(|| format!("failed to load model artifact from {}", config.model_path))?;

    metrics.set_model_info(
        &artifact.version,
        &artifact.algorithm.to_string(),
        artifact.r2,
    );
    logger.log_model_loaded(&artifact.describe());
    logger.log_startup(SERVICE_VERSION, &artifact.version);

    // Wire the use case and shared application state
    let use_case = PredictRevenueUseCase::with_default_engine(repository.clone());
    let app_state = Arc::new(api::AppState::new(
        use_case,
        repository,
        health_registry.clone(),
        metrics.clone(),
        logger.clone(),
    ));

    // Model is resident; the service can accept traffic
    health_registry.set_ready(true);

    // Start the API server
    let _api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
