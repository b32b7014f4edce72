//! Regression prediction engine

mod engine;

pub use engine::{expand_features, RegressionEngine};

use crate::artifact::ModelArtifact;
use crate::error::PredictionError;
use crate::models::FeatureVector;

/// Raw model output before result assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Unrounded revenue estimate.
    pub raw_estimate: f64,
    /// Training-time fit quality, clamped to [0,1].
    pub confidence: f32,
}

/// Trait for prediction implementations.
pub trait Predictor: Send + Sync {
    /// Evaluate the artifact's model on a validated feature vector.
    fn predict(
        &self,
        artifact: &ModelArtifact,
        features: &FeatureVector,
    ) -> Result<Estimate, PredictionError>;
}
