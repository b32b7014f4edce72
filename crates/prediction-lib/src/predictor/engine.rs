//! Polynomial regression evaluation
//!
//! Expands the validated feature triple to the polynomial basis the artifact
//! was trained on, then evaluates the fitted coefficients. Purely
//! computational; the dimensionality re-check guards against an artifact and
//! input that disagree despite upstream validation.

use super::{Estimate, Predictor};
use crate::artifact::ModelArtifact;
use crate::error::PredictionError;
use crate::models::FeatureVector;

/// Evaluates linear and polynomial regression artifacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegressionEngine;

impl RegressionEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Predictor for RegressionEngine {
    fn predict(
        &self,
        artifact: &ModelArtifact,
        features: &FeatureVector,
    ) -> Result<Estimate, PredictionError> {
        let expanded = expand_features(&features.as_array(), artifact.degree);

        if expanded.len() != artifact.coefficients.len() {
            return Err(PredictionError::Inference(format!(
                "feature dimension {} does not match model dimension {}",
                expanded.len(),
                artifact.coefficients.len()
            )));
        }

        let raw_estimate = artifact.intercept
            + expanded
                .iter()
                .zip(artifact.coefficients.iter())
                .map(|(term, coefficient)| term * coefficient)
                .sum::<f64>();

        Ok(Estimate {
            raw_estimate,
            confidence: artifact.confidence(),
        })
    }
}

/// Polynomial basis expansion without a bias term.
///
/// Terms are ordered by total degree, and within each degree by
/// combinations-with-replacement of the input indices, matching the layout
/// the training pipeline fits coefficients against. Degree 1 is the
/// identity.
pub fn expand_features(features: &[f64], degree: u32) -> Vec<f64> {
    // Each entry pairs a term value with the highest input index it uses,
    // so the next degree multiplies only by indices >= that one.
    let mut previous: Vec<(usize, f64)> =
        features.iter().copied().enumerate().collect();
    let mut expanded: Vec<f64> = previous.iter().map(|&(_, term)| term).collect();

    for _ in 1..degree {
        let mut next = Vec::new();
        for &(last_index, term) in &previous {
            for (index, &feature) in features.iter().enumerate().skip(last_index) {
                next.push((index, term * feature));
            }
        }
        expanded.extend(next.iter().map(|&(_, term)| term));
        previous = next;
    }

    expanded
}
