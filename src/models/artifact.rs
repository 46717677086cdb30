//! Fitted scaler and regressor seams, plus their JSON-parameter implementations

use crate::error::{ArtifactKind, PredictionError};
use crate::feature_extractor::FEATURE_COUNT;
use serde::Deserialize;

/// A fitted normalization transform over one model input row
pub trait FeatureScaler: Send + Sync {
    /// Map a raw feature row to the normalized row the regressor expects
    fn transform(&self, raw: &[f32; FEATURE_COUNT]) -> Result<[f32; FEATURE_COUNT], PredictionError>;
}

/// A fitted regression function over one normalized input row
pub trait Regressor: Send + Sync {
    /// Predict the fuel efficiency (MPG) for a normalized row
    fn predict(&self, scaled: &[f32; FEATURE_COUNT]) -> Result<f64, PredictionError>;
}

/// Standard-score scaler: `(x - mean) / scale` per column
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler from fitted statistics.
    ///
    /// A zero scale leaves the centered column unscaled.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, String> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Parse and validate a JSON `{"mean": [..], "scale": [..]}` document
    pub fn from_json(bytes: &[u8]) -> Result<Self, String> {
        let scaler: Self = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), String> {
        check_params("mean", &self.mean)?;
        check_params("scale", &self.scale)
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, raw: &[f32; FEATURE_COUNT]) -> Result<[f32; FEATURE_COUNT], PredictionError> {
        let mut scaled = [0.0_f32; FEATURE_COUNT];
        for (i, value) in raw.iter().enumerate() {
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            scaled[i] = ((*value as f64 - self.mean[i]) / scale) as f32;
        }
        Ok(scaled)
    }
}

/// Ordinary linear regressor: `intercept + sum(coef_i * x_i)`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearRegressor {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, String> {
        let model = Self {
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parse and validate a JSON `{"coefficients": [..], "intercept": x}` document
    pub fn from_json(bytes: &[u8]) -> Result<Self, String> {
        let model: Self = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), String> {
        check_params("coefficients", &self.coefficients)?;
        if !self.intercept.is_finite() {
            return Err(format!("intercept is not finite: {}", self.intercept));
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, scaled: &[f32; FEATURE_COUNT]) -> Result<f64, PredictionError> {
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(scaled.iter())
            .map(|(c, x)| c * *x as f64)
            .sum();
        Ok(self.intercept + dot)
    }
}

fn check_params(name: &str, values: &[f64]) -> Result<(), String> {
    if values.len() != FEATURE_COUNT {
        return Err(format!(
            "expected {} {} values, found {}",
            FEATURE_COUNT,
            name,
            values.len()
        ));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(format!("{name} contains a non-finite value: {bad}"));
    }
    Ok(())
}

/// Copy a flat output into a fixed-width row, checking its length
pub(crate) fn to_row(kind: ArtifactKind, data: &[f32]) -> Result<[f32; FEATURE_COUNT], PredictionError> {
    <[f32; FEATURE_COUNT]>::try_from(data).map_err(|_| PredictionError::OutputShape {
        kind,
        expected: FEATURE_COUNT,
        actual: data.len(),
    })
}
