//! Error types for artifact loading and prediction

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two fitted artifacts an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Scaler,
    Model,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Scaler => f.write_str("Scaler"),
            ArtifactKind::Model => f.write_str("Model"),
        }
    }
}

/// Fatal configuration errors raised while loading artifacts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArtifactError {
    /// Artifact file does not exist
    #[error("{kind} file not found! Expected at: {}", path.display())]
    Missing { kind: ArtifactKind, path: PathBuf },

    /// Artifact file exists but could not be deserialized
    #[error("{kind} file at {} could not be loaded: {reason}", path.display())]
    Corrupt {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },
}

impl ArtifactError {
    /// Path of the offending artifact file
    pub fn path(&self) -> &PathBuf {
        match self {
            ArtifactError::Missing { path, .. } | ArtifactError::Corrupt { path, .. } => path,
        }
    }

    /// Which artifact failed
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactError::Missing { kind, .. } | ArtifactError::Corrupt { kind, .. } => *kind,
        }
    }
}

/// Errors raised while running a prediction
#[derive(Error, Debug)]
pub enum PredictionError {
    /// Scaler transform failed
    #[error("Scaler transform failed: {0}")]
    Scaler(String),

    /// Regressor inference failed
    #[error("Model inference failed: {0}")]
    Model(String),

    /// Artifact produced an unexpected number of values
    #[error("{kind} output has {actual} values, expected {expected}")]
    OutputShape {
        kind: ArtifactKind,
        expected: usize,
        actual: usize,
    },

    /// Regressor returned NaN or infinity
    #[error("Model returned a non-finite prediction: {0}")]
    NonFinite(f64),
}
