//! Predict use case: validate, infer, assemble
//!
//! The single seam collaborators call. Each step is a hard gate: a failure
//! propagates unchanged and no partial result is returned. The use case
//! knows nothing about HTTP status codes or UI widgets.

use std::sync::Arc;

use crate::error::PredictionError;
use crate::models::{FeatureVector, ModelDescription, PredictionRequest, PredictionResult};
use crate::predictor::{Predictor, RegressionEngine};
use crate::repository::ModelStore;

/// Decimal places kept on the predicted revenue.
const REVENUE_DECIMALS: i32 = 2;

/// Orchestrates validation, model access, and inference.
pub struct PredictRevenueUseCase {
    store: Arc<dyn ModelStore>,
    engine: Arc<dyn Predictor>,
}

impl PredictRevenueUseCase {
    pub fn new(store: Arc<dyn ModelStore>, engine: Arc<dyn Predictor>) -> Self {
        Self { store, engine }
    }

    /// Use case wired to the standard regression engine.
    pub fn with_default_engine(store: Arc<dyn ModelStore>) -> Self {
        Self::new(store, Arc::new(RegressionEngine::new()))
    }

    /// Run the full pipeline for one request.
    pub fn execute(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionError> {
        let features = FeatureVector::from_request(request)?;
        let artifact = self.store.current()?;
        let estimate = self.engine.predict(&artifact, &features)?;

        // The domain does not admit negative revenue; a model emitting one
        // on valid input is an internal defect, not a caller mistake.
        if estimate.raw_estimate < 0.0 {
            return Err(PredictionError::Inference(format!(
                "model produced negative revenue estimate {:.2}",
                estimate.raw_estimate
            )));
        }

        Ok(PredictionResult {
            predicted_revenue: round_revenue(estimate.raw_estimate),
            model_used: artifact.algorithm,
            confidence_score: estimate.confidence,
        })
    }

    /// Metadata about the resident model, for metadata-only callers.
    pub fn describe_model(&self) -> Result<ModelDescription, PredictionError> {
        Ok(self.store.current()?.describe())
    }
}

fn round_revenue(value: f64) -> f64 {
    let scale = 10f64.powi(REVENUE_DECIMALS);
    (value * scale).round() / scale
}
