//! Fitted artifacts and the prediction service

pub mod artifact;
pub mod inference;
pub mod loader;
pub mod onnx;

pub use artifact::{FeatureScaler, LinearRegressor, Regressor, StandardScaler};
pub use inference::Predictor;
pub use loader::{ArtifactCache, ArtifactLoader, Artifacts};
