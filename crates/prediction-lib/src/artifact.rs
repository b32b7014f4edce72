//! Model artifact: a trained, serialized regression plus its metadata
//!
//! The artifact is produced by the offline training workflow and stored as a
//! single JSON document. It carries the fitted coefficients over the expanded
//! polynomial feature space together with the metadata the serving side needs:
//! algorithm kind, feature order, training-time fit quality, and version.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelLoadError;
use crate::models::ModelDescription;

/// Feature names in training order. The loader rejects artifacts whose
/// declared order differs.
pub const EXPECTED_FEATURES: [&str; 3] =
    ["experience_months", "number_of_sales", "seasonal_factor"];

/// Which regression variant produced the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    Linear,
    Polynomial,
}

impl std::fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlgorithmKind::Linear => write!(f, "linear"),
            AlgorithmKind::Polynomial => write!(f, "polynomial"),
        }
    }
}

/// A loaded fitted model plus metadata.
///
/// Owned by the model repository and shared read-only for the process
/// lifetime; replaced wholesale only by an explicit reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub algorithm: AlgorithmKind,
    /// Polynomial degree of the feature expansion; 1 for plain linear.
    pub degree: u32,
    /// Pre-expansion feature names in training order.
    pub feature_names: Vec<String>,
    /// One coefficient per expanded feature, expansion order.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// R² on the training evaluation split; source of the confidence score.
    pub r2: f64,
    pub version: String,
    pub trained_at: DateTime<Utc>,
    /// SHA-256 of the artifact file, filled in by the repository after load.
    #[serde(skip)]
    pub checksum: String,
}

impl ModelArtifact {
    /// Number of expanded features this artifact must carry coefficients for.
    pub fn expanded_len(&self) -> usize {
        expanded_feature_count(EXPECTED_FEATURES.len(), self.degree)
    }

    /// Confidence score attached to every prediction made with this
    /// artifact: the stored training R², clamped to [0,1]. Static per
    /// model, never recomputed per request.
    pub fn confidence(&self) -> f32 {
        self.r2.clamp(0.0, 1.0) as f32
    }

    /// Verify internal consistency of a freshly deserialized artifact.
    pub fn verify_schema(&self) -> Result<(), ModelLoadError> {
        if self.degree == 0 {
            return Err(ModelLoadError::SchemaMismatch(
                "degree must be at least 1".to_string(),
            ));
        }
        match self.algorithm {
            AlgorithmKind::Linear if self.degree != 1 => {
                return Err(ModelLoadError::SchemaMismatch(format!(
                    "linear artifact declares degree {}",
                    self.degree
                )));
            }
            AlgorithmKind::Polynomial if self.degree < 2 => {
                return Err(ModelLoadError::SchemaMismatch(
                    "polynomial artifact declares degree 1".to_string(),
                ));
            }
            _ => {}
        }

        if self.feature_names != EXPECTED_FEATURES {
            return Err(ModelLoadError::SchemaMismatch(format!(
                "expected features {:?}, artifact declares {:?}",
                EXPECTED_FEATURES, self.feature_names
            )));
        }

        let expected = self.expanded_len();
        if self.coefficients.len() != expected {
            return Err(ModelLoadError::SchemaMismatch(format!(
                "expected {} coefficients for degree {}, artifact carries {}",
                expected,
                self.degree,
                self.coefficients.len()
            )));
        }

        if !self.intercept.is_finite()
            || !self.r2.is_finite()
            || self.coefficients.iter().any(|c| !c.is_finite())
        {
            return Err(ModelLoadError::SchemaMismatch(
                "artifact contains non-finite parameters".to_string(),
            ));
        }

        Ok(())
    }

    /// Metadata view for metadata-only callers.
    pub fn describe(&self) -> ModelDescription {
        ModelDescription {
            algorithm: self.algorithm,
            degree: self.degree,
            feature_names: self.feature_names.clone(),
            version: self.version.clone(),
            trained_at: self.trained_at,
            r2: self.r2,
            artifact_sha256: self.checksum.clone(),
        }
    }
}

/// Size of the polynomial basis (without bias term) for `num_features`
/// inputs at the given degree: all combinations with replacement of total
/// degree 1 through `degree`.
pub fn expanded_feature_count(num_features: usize, degree: u32) -> usize {
    let mut total = 0;
    let mut per_degree = 1;
    for k in 1..=degree as usize {
        // C(n + k - 1, k), built incrementally
        per_degree = per_degree * (num_features + k - 1) / k;
        total += per_degree;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_fixture() -> ModelArtifact {
        ModelArtifact {
            algorithm: AlgorithmKind::Linear,
            degree: 1,
            feature_names: EXPECTED_FEATURES.iter().map(|s| s.to_string()).collect(),
            coefficients: vec![45.0, 80.0, 150.0],
            intercept: 1200.0,
            r2: 0.91,
            version: "v1.0.0".to_string(),
            trained_at: Utc::now(),
            checksum: String::new(),
        }
    }

    #[test]
    fn test_expanded_feature_count() {
        assert_eq!(expanded_feature_count(3, 1), 3);
        assert_eq!(expanded_feature_count(3, 2), 9);
        assert_eq!(expanded_feature_count(3, 3), 19);
        assert_eq!(expanded_feature_count(1, 2), 2);
    }

    #[test]
    fn test_valid_artifact_passes_schema_check() {
        assert!(linear_fixture().verify_schema().is_ok());
    }

    #[test]
    fn test_wrong_feature_order_rejected() {
        let mut artifact = linear_fixture();
        artifact.feature_names.swap(0, 2);
        let err = artifact.verify_schema().unwrap_err();
        assert!(matches!(err, ModelLoadError::SchemaMismatch(_)));
    }

    #[test]
    fn test_wrong_coefficient_count_rejected() {
        let mut artifact = linear_fixture();
        artifact.coefficients.push(1.0);
        assert!(matches!(
            artifact.verify_schema(),
            Err(ModelLoadError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_degree_algorithm_mismatch_rejected() {
        let mut artifact = linear_fixture();
        artifact.degree = 2;
        assert!(matches!(
            artifact.verify_schema(),
            Err(ModelLoadError::SchemaMismatch(_))
        ));

        let mut artifact = linear_fixture();
        artifact.algorithm = AlgorithmKind::Polynomial;
        assert!(matches!(
            artifact.verify_schema(),
            Err(ModelLoadError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_non_finite_parameters_rejected() {
        let mut artifact = linear_fixture();
        artifact.coefficients[1] = f64::NAN;
        assert!(artifact.verify_schema().is_err());

        let mut artifact = linear_fixture();
        artifact.intercept = f64::INFINITY;
        assert!(artifact.verify_schema().is_err());
    }

    #[test]
    fn test_confidence_clamped_to_unit_interval() {
        let mut artifact = linear_fixture();
        artifact.r2 = 0.91;
        assert!((artifact.confidence() - 0.91).abs() < 1e-6);

        artifact.r2 = -0.4; // worse than predicting the mean
        assert_eq!(artifact.confidence(), 0.0);

        artifact.r2 = 1.2;
        assert_eq!(artifact.confidence(), 1.0);
    }

    #[test]
    fn test_algorithm_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AlgorithmKind::Polynomial).unwrap(),
            "\"polynomial\""
        );
        assert_eq!(
            serde_json::from_str::<AlgorithmKind>("\"linear\"").unwrap(),
            AlgorithmKind::Linear
        );
    }

    #[test]
    fn test_describe_reflects_artifact() {
        let mut artifact = linear_fixture();
        artifact.checksum = "abc123".to_string();
        let description = artifact.describe();
        assert_eq!(description.algorithm, AlgorithmKind::Linear);
        assert_eq!(description.version, "v1.0.0");
        assert_eq!(description.artifact_sha256, "abc123");
        assert_eq!(description.feature_names, EXPECTED_FEATURES.to_vec());
    }
}
