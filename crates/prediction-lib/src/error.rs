//! Error taxonomy for the prediction pipeline
//!
//! Every failure a caller can observe is one of four kinds. All of them
//! propagate unchanged from the point of detection up through the use case;
//! the transport layer maps each kind to a caller-facing status.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading a model artifact from storage.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// The configured artifact file does not exist.
    #[error("model artifact not found: {path}")]
    Missing { path: PathBuf },

    /// The artifact file exists but could not be read.
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact file is not valid JSON for the expected shape.
    #[error("malformed model artifact {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact parsed but its declared schema is inconsistent
    /// (wrong feature order, coefficient count, degree, or non-finite values).
    #[error("model schema mismatch: {0}")]
    SchemaMismatch(String),
}

/// Errors surfaced by the predict use case.
#[derive(Debug, Error)]
pub enum PredictionError {
    /// Input failed validation. Recoverable by the caller correcting input.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Artifact loading failed. Fatal at startup.
    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    /// A prediction was requested before any artifact was loaded.
    /// Indicates a startup-ordering bug; surfaced as service-unavailable.
    #[error("no model loaded")]
    ModelNotLoaded,

    /// The model and input disagreed at inference time, or the model
    /// produced an out-of-domain value. Internal defect.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictionError {
    /// Stable machine-readable code for transport-layer mapping.
    pub fn code(&self) -> &'static str {
        match self {
            PredictionError::Validation(_) => "invalid_input",
            PredictionError::ModelLoad(_) => "model_load_failed",
            PredictionError::ModelNotLoaded => "model_not_loaded",
            PredictionError::Inference(_) => "inference_failed",
        }
    }
}
