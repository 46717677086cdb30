//! Sample Vehicle Predictor
//!
//! Generates random vehicles within the form's ranges, adds the reference
//! cars, and prints one JSON prediction per line.
//!
//! Usage: sample-vehicles [count] [muscle_rate]

use anyhow::{Context, Result};
use fuel_efficiency_predictor::{
    config::AppConfig,
    logging,
    types::{reference_vehicles, EfficiencyBand, FeatureVector, Origin, PredictionResult},
    Predictor,
};
use rand::Rng;
use serde::Serialize;
use std::io::{self, Write};
use tracing::{info, warn};

/// One line of output
#[derive(Debug, Serialize)]
struct SampleLine {
    label: String,
    features: FeatureVector,
    #[serde(flatten)]
    result: PredictionResult,
    band: EfficiencyBand,
}

/// Vehicle generator for sampling
struct VehicleGenerator {
    rng: rand::rngs::ThreadRng,
    vehicle_counter: u64,
}

impl VehicleGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            vehicle_counter: 0,
        }
    }

    /// Generate a small, light economy car
    fn generate_economy(&mut self) -> (String, FeatureVector) {
        self.vehicle_counter += 1;
        let features = FeatureVector {
            cylinders: *self.random_choice(&[3, 4, 4, 4, 6]),
            displacement: self.rng.gen_range(68.0..160.0_f64).round(),
            horsepower: self.rng.gen_range(46..110),
            weight: self.rng.gen_range(1600..2800),
            acceleration: (self.rng.gen_range(13.0..22.0_f64) * 2.0).round() / 2.0,
            model_year: self.rng.gen_range(70..=82),
            origin: *self.random_choice(&Origin::ALL),
        };
        (format!("economy_{:04}", self.vehicle_counter), features)
    }

    /// Generate a heavy, powerful muscle car
    fn generate_muscle(&mut self) -> (String, FeatureVector) {
        self.vehicle_counter += 1;
        let features = FeatureVector {
            cylinders: *self.random_choice(&[6, 8, 8]),
            displacement: self.rng.gen_range(250.0..455.0_f64).round(),
            horsepower: self.rng.gen_range(140..=250),
            weight: self.rng.gen_range(3400..5200),
            acceleration: (self.rng.gen_range(8.0..13.0_f64) * 2.0).round() / 2.0,
            model_year: self.rng.gen_range(70..=79),
            origin: Origin::Usa,
        };
        (format!("muscle_{:04}", self.vehicle_counter), features)
    }

    fn random_choice<'a, T>(&mut self, choices: &'a [T]) -> &'a T {
        &choices[self.rng.gen_range(0..choices.len())]
    }
}

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    logging::init(&config.logging)?;

    info!("Starting Sample Vehicle Predictor");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(20);
    let muscle_rate: f64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.3_f64)
        .clamp(0.0, 1.0);

    info!(count, muscle_rate, "Configuration loaded");

    let predictor = Predictor::from_config(&config).context("Failed to load artifacts")?;

    let mut samples: Vec<(String, FeatureVector)> = reference_vehicles()
        .into_iter()
        .map(|r| (r.name.to_string(), r.features))
        .collect();

    let mut generator = VehicleGenerator::new();
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let sample = if rng.gen_bool(muscle_rate) {
            generator.generate_muscle()
        } else {
            generator.generate_economy()
        };
        samples.push(sample);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0;

    for (label, features) in samples {
        match predictor.predict(&features) {
            Ok(result) => {
                let line = SampleLine {
                    label,
                    features,
                    result,
                    band: result.band(),
                };
                writeln!(out, "{}", serde_json::to_string(&line)?)?;
            }
            Err(e) => {
                failed += 1;
                warn!(label = %label, error = %e, "Prediction failed");
            }
        }
    }

    info!(generated = count, failed, "Completed sampling");

    Ok(())
}
