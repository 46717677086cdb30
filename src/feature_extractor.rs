//! Feature extraction for fuel-efficiency model inference.
//!
//! This module turns a [`FeatureVector`] into the positional input the
//! fitted scaler and regressor expect. It is the only place where the
//! column order is written down.

use crate::types::FeatureVector;

/// Number of model input columns
pub const FEATURE_COUNT: usize = 7;

/// Feature extractor that transforms vehicle attributes into model input features.
///
/// Columns are emitted in the exact order used when the scaler and
/// regressor were fitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the model input row for a vehicle.
    pub fn extract(&self, fv: &FeatureVector) -> [f32; FEATURE_COUNT] {
        [
            fv.cylinders as f32,
            fv.displacement as f32,
            fv.horsepower as f32,
            fv.weight as f32,
            fv.acceleration as f32,
            fv.model_year as f32,
            fv.origin.code() as f32,
        ]
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names (training column order).
    pub fn feature_names(&self) -> [&'static str; FEATURE_COUNT] {
        [
            "cylinders",
            "displacement",
            "horsepower",
            "weight",
            "acceleration",
            "model_year",
            "origin",
        ]
    }
}
