//! Type definitions for the fuel-efficiency predictor

pub mod prediction;
pub mod vehicle;

pub use prediction::{EfficiencyBand, PredictionResult, MPG_TO_KM_PER_LITER};
pub use vehicle::{reference_vehicles, FeatureVector, FieldRange, Origin, ReferenceVehicle};
