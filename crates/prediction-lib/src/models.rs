//! Core data models for revenue prediction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artifact::AlgorithmKind;
use crate::error::PredictionError;

/// Inclusive bounds for the seasonal factor (1 = low season, 10 = peak).
pub const SEASONAL_FACTOR_MIN: f64 = 1.0;
pub const SEASONAL_FACTOR_MAX: f64 = 10.0;

/// Raw, untrusted prediction input as it arrives from a collaborator.
///
/// All fields are optional so that a missing field is a validation
/// failure of the core, not a transport-layer rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub experience_months: Option<f64>,
    pub number_of_sales: Option<f64>,
    pub seasonal_factor: Option<f64>,
}

impl PredictionRequest {
    pub fn new(experience_months: f64, number_of_sales: f64, seasonal_factor: f64) -> Self {
        Self {
            experience_months: Some(experience_months),
            number_of_sales: Some(number_of_sales),
            seasonal_factor: Some(seasonal_factor),
        }
    }
}

/// Validated numeric input to the model.
///
/// Constructed only through validation and never mutated afterwards.
/// Field order matches the order the model was trained on:
/// experience, sales count, seasonal factor.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    experience_months: f64,
    number_of_sales: u32,
    seasonal_factor: f64,
}

impl FeatureVector {
    /// Validate raw input into a feature vector.
    ///
    /// Fails when any field is missing, non-finite, negative (experience,
    /// sales), non-integral (sales), or the seasonal factor is out of range.
    pub fn from_request(request: &PredictionRequest) -> Result<Self, PredictionError> {
        let experience_months = require_finite("experience_months", request.experience_months)?;
        if experience_months < 0.0 {
            return Err(PredictionError::Validation(
                "experience_months cannot be negative".to_string(),
            ));
        }

        let sales_raw = require_finite("number_of_sales", request.number_of_sales)?;
        if sales_raw < 0.0 {
            return Err(PredictionError::Validation(
                "number_of_sales cannot be negative".to_string(),
            ));
        }
        if sales_raw.fract() != 0.0 || sales_raw > u32::MAX as f64 {
            return Err(PredictionError::Validation(
                "number_of_sales must be a whole number".to_string(),
            ));
        }
        let number_of_sales = sales_raw as u32;

        let seasonal_factor = require_finite("seasonal_factor", request.seasonal_factor)?;
        if !(SEASONAL_FACTOR_MIN..=SEASONAL_FACTOR_MAX).contains(&seasonal_factor) {
            return Err(PredictionError::Validation(format!(
                "seasonal_factor must be between {} and {}",
                SEASONAL_FACTOR_MIN, SEASONAL_FACTOR_MAX
            )));
        }

        Ok(Self {
            experience_months,
            number_of_sales,
            seasonal_factor,
        })
    }

    pub fn experience_months(&self) -> f64 {
        self.experience_months
    }

    pub fn number_of_sales(&self) -> u32 {
        self.number_of_sales
    }

    pub fn seasonal_factor(&self) -> f64 {
        self.seasonal_factor
    }

    /// The raw feature triple in training order.
    pub fn as_array(&self) -> [f64; 3] {
        [
            self.experience_months,
            self.number_of_sales as f64,
            self.seasonal_factor,
        ]
    }
}

impl TryFrom<&PredictionRequest> for FeatureVector {
    type Error = PredictionError;

    fn try_from(request: &PredictionRequest) -> Result<Self, Self::Error> {
        Self::from_request(request)
    }
}

fn require_finite(name: &str, value: Option<f64>) -> Result<f64, PredictionError> {
    let value =
        value.ok_or_else(|| PredictionError::Validation(format!("{} is required", name)))?;
    if !value.is_finite() {
        return Err(PredictionError::Validation(format!(
            "{} must be a finite number",
            name
        )));
    }
    Ok(value)
}

/// Immutable prediction output, created once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted revenue in BRL, rounded to two decimal places.
    pub predicted_revenue: f64,
    /// Which fitted model produced the value.
    pub model_used: AlgorithmKind,
    /// Bounded [0,1] quality indicator derived from training-time fit.
    pub confidence_score: f32,
}

/// Read-only metadata view of the resident model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescription {
    pub algorithm: AlgorithmKind,
    pub degree: u32,
    pub feature_names: Vec<String>,
    pub version: String,
    pub trained_at: DateTime<Utc>,
    pub r2: f64,
    pub artifact_sha256: String,
}
