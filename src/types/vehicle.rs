//! Vehicle attributes consumed by the fuel-efficiency model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Country of origin, encoded the way the model was trained (1, 2, 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Usa,
    Europe,
    Japan,
}

impl Origin {
    /// All origins in code order
    pub const ALL: [Origin; 3] = [Origin::Usa, Origin::Europe, Origin::Japan];

    /// Numeric code used as the model's `origin` column
    pub fn code(self) -> u8 {
        match self {
            Origin::Usa => 1,
            Origin::Europe => 2,
            Origin::Japan => 3,
        }
    }

    /// Look up an origin by its numeric code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Origin::Usa),
            2 => Some(Origin::Europe),
            3 => Some(Origin::Japan),
            _ => None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Origin::Usa => "USA",
            Origin::Europe => "Europe",
            Origin::Japan => "Japan",
        };
        f.write_str(name)
    }
}

impl FromStr for Origin {
    type Err = String;

    /// Accepts the numeric code or the country name (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Origin::from_code(code).ok_or_else(|| format!("unknown origin code {code}"));
        }
        match s.to_ascii_lowercase().as_str() {
            "usa" | "us" | "america" => Ok(Origin::Usa),
            "europe" | "eu" => Ok(Origin::Europe),
            "japan" | "jp" => Ok(Origin::Japan),
            other => Err(format!("unknown origin '{other}'")),
        }
    }
}

/// Inclusive range, default and step of a numeric form field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl FieldRange {
    const fn new(min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            min,
            max,
            default,
            step,
        }
    }

    /// Clamp a value into the range
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Whether the value lies inside the range
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

pub const CYLINDERS: FieldRange = FieldRange::new(3.0, 8.0, 4.0, 1.0);
pub const DISPLACEMENT: FieldRange = FieldRange::new(68.0, 455.0, 200.0, 10.0);
pub const HORSEPOWER: FieldRange = FieldRange::new(40.0, 250.0, 120.0, 5.0);
pub const WEIGHT: FieldRange = FieldRange::new(1500.0, 6000.0, 3000.0, 100.0);
pub const ACCELERATION: FieldRange = FieldRange::new(8.0, 30.0, 15.0, 0.5);
pub const MODEL_YEAR: FieldRange = FieldRange::new(70.0, 82.0, 78.0, 1.0);

/// The seven vehicle attributes, declared in the column order the scaler
/// and regressor were fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Number of cylinders (3-8)
    pub cylinders: u8,
    /// Engine displacement in cubic inches (68-455)
    pub displacement: f64,
    /// Horsepower (40-250)
    pub horsepower: u16,
    /// Curb weight in pounds (1500-6000)
    pub weight: u16,
    /// 0-60 mph time in seconds (8-30)
    pub acceleration: f64,
    /// Two-digit model year, 70 = 1970 (70-82)
    pub model_year: u8,
    /// Country of origin
    pub origin: Origin,
}

impl FeatureVector {
    /// Copy of this vector with every field clamped into its declared range
    pub fn clamped(&self) -> Self {
        Self {
            cylinders: CYLINDERS.clamp(self.cylinders as f64) as u8,
            displacement: DISPLACEMENT.clamp(self.displacement),
            horsepower: HORSEPOWER.clamp(self.horsepower as f64) as u16,
            weight: WEIGHT.clamp(self.weight as f64) as u16,
            acceleration: ACCELERATION.clamp(self.acceleration),
            model_year: MODEL_YEAR.clamp(self.model_year as f64) as u8,
            origin: self.origin,
        }
    }

    /// Whether every field lies inside its declared range
    pub fn is_within_ranges(&self) -> bool {
        CYLINDERS.contains(self.cylinders as f64)
            && DISPLACEMENT.contains(self.displacement)
            && HORSEPOWER.contains(self.horsepower as f64)
            && WEIGHT.contains(self.weight as f64)
            && ACCELERATION.contains(self.acceleration)
            && MODEL_YEAR.contains(self.model_year as f64)
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            cylinders: CYLINDERS.default as u8,
            displacement: DISPLACEMENT.default,
            horsepower: HORSEPOWER.default as u16,
            weight: WEIGHT.default as u16,
            acceleration: ACCELERATION.default,
            model_year: MODEL_YEAR.default as u8,
            origin: Origin::Japan,
        }
    }
}

/// A documented real-life car with its approximate expected MPG
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceVehicle {
    pub name: &'static str,
    pub features: FeatureVector,
    pub expected_mpg: f64,
}

/// Reference cars shown alongside the form
pub fn reference_vehicles() -> Vec<ReferenceVehicle> {
    vec![
        ReferenceVehicle {
            name: "1976 Ford Mustang",
            features: FeatureVector {
                cylinders: 8,
                displacement: 300.0,
                horsepower: 300,
                weight: 3800,
                acceleration: ACCELERATION.default,
                model_year: 76,
                origin: Origin::Usa,
            },
            expected_mpg: 14.0,
        },
        ReferenceVehicle {
            name: "1980 Honda Civic",
            features: FeatureVector {
                cylinders: 4,
                displacement: 90.0,
                horsepower: 67,
                weight: 2000,
                acceleration: ACCELERATION.default,
                model_year: 80,
                origin: Origin::Japan,
            },
            expected_mpg: 36.0,
        },
        ReferenceVehicle {
            name: "1978 VW Golf/Rabbit",
            features: FeatureVector {
                cylinders: 4,
                displacement: 90.0,
                horsepower: 78,
                weight: 2200,
                acceleration: ACCELERATION.default,
                model_year: 78,
                origin: Origin::Europe,
            },
            expected_mpg: 31.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_codes() {
        for origin in Origin::ALL {
            assert_eq!(Origin::from_code(origin.code()), Some(origin));
        }
        assert_eq!(Origin::from_code(0), None);
        assert_eq!(Origin::from_code(4), None);
    }

    #[test]
    fn test_origin_parsing() {
        assert_eq!("1".parse::<Origin>(), Ok(Origin::Usa));
        assert_eq!("Europe".parse::<Origin>(), Ok(Origin::Europe));
        assert_eq!(" JAPAN ".parse::<Origin>(), Ok(Origin::Japan));
        assert!("7".parse::<Origin>().is_err());
        assert!("mars".parse::<Origin>().is_err());
    }

    #[test]
    fn test_default_vehicle_matches_form_defaults() {
        let fv = FeatureVector::default();
        assert_eq!(fv.cylinders, 4);
        assert_eq!(fv.displacement, 200.0);
        assert_eq!(fv.horsepower, 120);
        assert_eq!(fv.weight, 3000);
        assert_eq!(fv.acceleration, 15.0);
        assert_eq!(fv.model_year, 78);
        assert_eq!(fv.origin, Origin::Japan);
        assert!(fv.is_within_ranges());
    }

    #[test]
    fn test_clamped() {
        let fv = FeatureVector {
            cylinders: 12,
            displacement: 20.0,
            horsepower: 400,
            weight: 900,
            acceleration: 45.0,
            model_year: 99,
            origin: Origin::Usa,
        };
        assert!(!fv.is_within_ranges());

        let clamped = fv.clamped();
        assert_eq!(clamped.cylinders, 8);
        assert_eq!(clamped.displacement, 68.0);
        assert_eq!(clamped.horsepower, 250);
        assert_eq!(clamped.weight, 1500);
        assert_eq!(clamped.acceleration, 30.0);
        assert_eq!(clamped.model_year, 82);
        assert!(clamped.is_within_ranges());
    }

    #[test]
    fn test_feature_vector_serialization() {
        let fv = FeatureVector::default();
        let json = serde_json::to_string(&fv).unwrap();
        assert!(json.contains("\"origin\":\"japan\""));

        let deserialized: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(fv, deserialized);
    }

    #[test]
    fn test_reference_vehicles() {
        let refs = reference_vehicles();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].features.origin, Origin::Usa);
        assert_eq!(refs[1].expected_mpg, 36.0);
    }
}
