//! Fuel Efficiency Predictor Library
//!
//! Predicts the fuel efficiency (MPG and km/L) of 1970-1982 cars from seven
//! vehicle attributes using a pre-trained feature scaler and regressor.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod form;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod types;

pub use config::AppConfig;
pub use error::{ArtifactError, ArtifactKind, PredictionError};
pub use feature_extractor::FeatureExtractor;
pub use form::VehicleForm;
pub use models::{ArtifactCache, ArtifactLoader, Artifacts, Predictor};
pub use types::{EfficiencyBand, FeatureVector, Origin, PredictionResult};
