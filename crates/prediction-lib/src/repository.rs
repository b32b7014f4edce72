//! Model repository: loads the artifact once and shares it read-only
//!
//! The repository owns the single resident `ModelArtifact`. `load` performs
//! the only disk I/O in the pipeline; `current` hands out the resident
//! artifact without touching storage and is safe to call from arbitrarily
//! many concurrent requests. `reload` installs a replacement atomically:
//! readers see either the whole old artifact or the whole new one, and
//! in-flight predictions keep the `Arc` they already cloned.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sha2::{Digest, Sha256};
use tracing::info;

use crate::artifact::ModelArtifact;
use crate::error::{ModelLoadError, PredictionError};

/// Source of the resident model artifact, the seam the use case depends on.
pub trait ModelStore: Send + Sync {
    /// The already-loaded artifact, or `ModelNotLoaded` if no load succeeded.
    fn current(&self) -> Result<Arc<ModelArtifact>, PredictionError>;
}

/// File-backed model repository holding at most one artifact in memory.
pub struct ModelRepository {
    model_path: PathBuf,
    current: RwLock<Option<Arc<ModelArtifact>>>,
}

impl ModelRepository {
    /// Create a repository for the configured artifact path. Nothing is
    /// read from disk until `load` is called.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            current: RwLock::new(None),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Read, verify, and install the artifact from the configured path.
    ///
    /// On any failure the previously resident artifact (if one exists)
    /// stays installed, so a failed reload never degrades a serving process.
    pub fn load(&self) -> Result<Arc<ModelArtifact>, ModelLoadError> {
        let bytes = fs::read(&self.model_path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ModelLoadError::Missing {
                    path: self.model_path.clone(),
                }
            } else {
                ModelLoadError::Io {
                    path: self.model_path.clone(),
                    source,
                }
            }
        })?;

        let checksum = hex::encode(Sha256::digest(&bytes));

        let mut artifact: ModelArtifact =
            serde_json::from_slice(&bytes).map_err(|source| ModelLoadError::Malformed {
                path: self.model_path.clone(),
                source,
            })?;
        artifact.verify_schema()?;
        artifact.checksum = checksum;

        let artifact = Arc::new(artifact);
        *self.write_guard() = Some(artifact.clone());

        info!(
            version = %artifact.version,
            algorithm = %artifact.algorithm,
            r2 = artifact.r2,
            sha256 = %artifact.checksum,
            path = %self.model_path.display(),
            "Model artifact loaded"
        );

        Ok(artifact)
    }

    /// Replace the resident artifact with a freshly loaded one.
    pub fn reload(&self) -> Result<Arc<ModelArtifact>, ModelLoadError> {
        self.load()
    }

    pub fn is_loaded(&self) -> bool {
        self.read_guard().is_some()
    }

    // The lock only ever swaps a whole Option<Arc>, so a poisoned lock
    // still holds consistent state and can be recovered.
    fn read_guard(&self) -> RwLockReadGuard<'_, Option<Arc<ModelArtifact>>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Option<Arc<ModelArtifact>>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ModelStore for ModelRepository {
    fn current(&self) -> Result<Arc<ModelArtifact>, PredictionError> {
        self.read_guard()
            .as_ref()
            .cloned()
            .ok_or(PredictionError::ModelNotLoaded)
    }
}
