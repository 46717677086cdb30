//! Artifact loader: locates, deserializes and memoizes the fitted scaler and model

use crate::config::{ArtifactFormat, ArtifactsConfig};
use crate::error::{ArtifactError, ArtifactKind};
use crate::models::artifact::{FeatureScaler, LinearRegressor, Regressor, StandardScaler};
use crate::models::onnx::OnnxArtifact;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{error, info};

/// The fitted scaler and regressor, read-only once loaded
pub struct Artifacts {
    scaler: Box<dyn FeatureScaler>,
    model: Box<dyn Regressor>,
    scaler_path: PathBuf,
    model_path: PathBuf,
}

impl Artifacts {
    /// Pair an already-built scaler and regressor
    pub fn new(scaler: Box<dyn FeatureScaler>, model: Box<dyn Regressor>) -> Self {
        Self {
            scaler,
            model,
            scaler_path: PathBuf::new(),
            model_path: PathBuf::new(),
        }
    }

    pub fn scaler(&self) -> &dyn FeatureScaler {
        self.scaler.as_ref()
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    /// Where the scaler was loaded from (empty for in-memory artifacts)
    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    /// Where the model was loaded from (empty for in-memory artifacts)
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("scaler_path", &self.scaler_path)
            .field("model_path", &self.model_path)
            .finish_non_exhaustive()
    }
}

/// Loader for the scaler and model artifacts
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    scaler_path: PathBuf,
    model_path: PathBuf,
    format: ArtifactFormat,
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ArtifactLoader {
    /// Create a loader for explicit artifact paths
    pub fn new(scaler_path: PathBuf, model_path: PathBuf, format: ArtifactFormat) -> Self {
        Self {
            scaler_path,
            model_path,
            format,
            onnx_threads: 1,
        }
    }

    /// Create a loader from the artifacts section of the configuration
    pub fn from_config(config: &ArtifactsConfig) -> Self {
        Self {
            scaler_path: config.scaler_path(),
            model_path: config.model_path(),
            format: config.format,
            onnx_threads: config.onnx_threads.max(1),
        }
    }

    /// Set the number of ONNX Runtime threads per session
    pub fn with_threads(mut self, onnx_threads: usize) -> Self {
        self.onnx_threads = onnx_threads.max(1);
        self
    }

    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Load both artifacts.
    ///
    /// Both files must exist before either is deserialized.
    pub fn load(&self) -> Result<Artifacts, ArtifactError> {
        for (kind, path) in [
            (ArtifactKind::Scaler, &self.scaler_path),
            (ArtifactKind::Model, &self.model_path),
        ] {
            if !path.is_file() {
                error!(artifact = %kind, path = %path.display(), "Artifact file not found");
                return Err(ArtifactError::Missing {
                    kind,
                    path: path.clone(),
                });
            }
        }

        let scaler = self.load_scaler()?;
        let model = self.load_model()?;

        info!(
            format = ?self.format,
            scaler = %self.scaler_path.display(),
            model = %self.model_path.display(),
            "Artifacts loaded"
        );

        Ok(Artifacts {
            scaler,
            model,
            scaler_path: self.scaler_path.clone(),
            model_path: self.model_path.clone(),
        })
    }

    fn load_scaler(&self) -> Result<Box<dyn FeatureScaler>, ArtifactError> {
        let kind = ArtifactKind::Scaler;
        let path = &self.scaler_path;
        match self.format {
            ArtifactFormat::Json => {
                let bytes = read(kind, path)?;
                let scaler =
                    StandardScaler::from_json(&bytes).map_err(|reason| corrupt(kind, path, reason))?;
                Ok(Box::new(scaler))
            }
            ArtifactFormat::Onnx => {
                let scaler = OnnxArtifact::load(path, kind, self.onnx_threads)
                    .map_err(|reason| corrupt(kind, path, reason))?;
                Ok(Box::new(scaler))
            }
        }
    }

    fn load_model(&self) -> Result<Box<dyn Regressor>, ArtifactError> {
        let kind = ArtifactKind::Model;
        let path = &self.model_path;
        match self.format {
            ArtifactFormat::Json => {
                let bytes = read(kind, path)?;
                let model =
                    LinearRegressor::from_json(&bytes).map_err(|reason| corrupt(kind, path, reason))?;
                Ok(Box::new(model))
            }
            ArtifactFormat::Onnx => {
                let model = OnnxArtifact::load(path, kind, self.onnx_threads)
                    .map_err(|reason| corrupt(kind, path, reason))?;
                Ok(Box::new(model))
            }
        }
    }
}

fn read(kind: ArtifactKind, path: &Path) -> Result<Vec<u8>, ArtifactError> {
    std::fs::read(path).map_err(|e| corrupt(kind, path, e.to_string()))
}

fn corrupt(kind: ArtifactKind, path: &Path, reason: String) -> ArtifactError {
    error!(artifact = %kind, path = %path.display(), %reason, "Failed to load artifact");
    ArtifactError::Corrupt {
        kind,
        path: path.to_path_buf(),
        reason,
    }
}

type LoadFn = Box<dyn Fn() -> Result<Artifacts, ArtifactError> + Send + Sync>;

/// Process-lifetime memo of one artifact load.
///
/// The first caller runs the load; concurrent callers block until it
/// finishes and then share the same result. Failures are memoized too.
pub struct ArtifactCache {
    load: LoadFn,
    cell: OnceLock<Result<Arc<Artifacts>, ArtifactError>>,
}

impl ArtifactCache {
    /// Memoize the given loader
    pub fn new(loader: ArtifactLoader) -> Self {
        Self::with_loader(move || loader.load())
    }

    /// Memoize an arbitrary load function
    pub fn with_loader<F>(load: F) -> Self
    where
        F: Fn() -> Result<Artifacts, ArtifactError> + Send + Sync + 'static,
    {
        Self {
            load: Box::new(load),
            cell: OnceLock::new(),
        }
    }

    /// Get the artifacts, loading them on first access
    pub fn get(&self) -> Result<Arc<Artifacts>, ArtifactError> {
        self.cell
            .get_or_init(|| (self.load)().map(Arc::new))
            .clone()
    }

    /// Whether a load has already been attempted
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}
