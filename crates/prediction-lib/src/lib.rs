//! Core library for the sales revenue prediction service
//!
//! This crate provides the prediction serving pipeline:
//! - Input validation into feature vectors
//! - Model artifact loading and lifetime management
//! - Regression inference with confidence scoring
//! - The predict use case orchestrating the above
//! - Health checks and observability

pub mod artifact;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod repository;
pub mod use_case;

pub use artifact::{AlgorithmKind, ModelArtifact};
pub use error::{ModelLoadError, PredictionError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::{FeatureVector, ModelDescription, PredictionRequest, PredictionResult};
pub use observability::{PredictionMetrics, StructuredLogger};
pub use predictor::{Estimate, Predictor, RegressionEngine};
pub use repository::{ModelRepository, ModelStore};
pub use use_case::PredictRevenueUseCase;
