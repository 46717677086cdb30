//! Prediction output and its qualitative feedback band

use serde::{Deserialize, Serialize};
use std::fmt;

/// Miles-per-gallon to kilometers-per-liter conversion factor
pub const MPG_TO_KM_PER_LITER: f64 = 0.425144;

/// Round to one decimal place from the exact binary value, ties to even
pub fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Qualitative efficiency band of a predicted MPG value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EfficiencyBand {
    Low,
    Good,
    Excellent,
    Outstanding,
}

impl EfficiencyBand {
    pub const OUTSTANDING_MPG: f64 = 35.0;
    pub const EXCELLENT_MPG: f64 = 28.0;
    pub const GOOD_MPG: f64 = 20.0;

    /// Classify an MPG value. Lower bounds are inclusive.
    pub fn from_mpg(mpg: f64) -> Self {
        if mpg >= Self::OUTSTANDING_MPG {
            EfficiencyBand::Outstanding
        } else if mpg >= Self::EXCELLENT_MPG {
            EfficiencyBand::Excellent
        } else if mpg >= Self::GOOD_MPG {
            EfficiencyBand::Good
        } else {
            EfficiencyBand::Low
        }
    }

    /// Feedback shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            EfficiencyBand::Outstanding => "Outstanding! Most likely a Japanese car!",
            EfficiencyBand::Excellent => "Excellent fuel economy!",
            EfficiencyBand::Good => "Good for the 1970s-80s",
            EfficiencyBand::Low => "Classic American V8: drinks gas, but sounds amazing!",
        }
    }
}

impl fmt::Display for EfficiencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EfficiencyBand::Outstanding => "outstanding",
            EfficiencyBand::Excellent => "excellent",
            EfficiencyBand::Good => "good",
            EfficiencyBand::Low => "low-efficiency",
        };
        f.write_str(name)
    }
}

/// Predicted fuel efficiency in both reported units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Miles per gallon, rounded to one decimal (primary value)
    pub mpg: f64,
    /// Kilometers per liter derived from the rounded MPG, rounded to one decimal
    pub km_per_liter: f64,
}

impl PredictionResult {
    /// Build the result from the regressor's raw output
    pub fn from_raw(raw_mpg: f64) -> Self {
        let mpg = round_one_decimal(raw_mpg);
        Self {
            mpg,
            km_per_liter: round_one_decimal(mpg * MPG_TO_KM_PER_LITER),
        }
    }

    /// Feedback band of the primary value
    pub fn band(&self) -> EfficiencyBand {
        EfficiencyBand::from_mpg(self.mpg)
    }
}
