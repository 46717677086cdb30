//! Fuel Efficiency Predictor - Main Entry Point
//!
//! Loads the fitted scaler and regression model once, then runs the
//! interactive vehicle form on stdin/stdout.

use anyhow::{Context, Result};
use fuel_efficiency_predictor::{
    config::AppConfig, logging, metrics::SessionMetrics, ArtifactCache, ArtifactLoader,
    Predictor, VehicleForm,
};
use std::io;
use tracing::{error, info};

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    logging::init(&config.logging)?;

    info!("Starting Fuel Efficiency Predictor");
    info!(
        base_dir = %config.artifacts.base_dir.display(),
        format = ?config.artifacts.format,
        "Configuration loaded successfully"
    );

    // Load artifacts before accepting any input
    let cache = ArtifactCache::new(ArtifactLoader::from_config(&config.artifacts));
    let artifacts = match cache.get() {
        Ok(artifacts) => artifacts,
        Err(e) => {
            error!(error = %e, "Cannot start without both artifacts");
            eprintln!(
                "Make sure both `{}` and `{}` exist",
                config.artifacts.scaler_path().display(),
                config.artifacts.model_path().display()
            );
            return Err(e).context("Failed to load artifacts");
        }
    };
    let predictor = Predictor::new(artifacts);

    let metrics = SessionMetrics::new();
    let stdin = io::stdin();
    let mut form = VehicleForm::new(stdin.lock(), io::stdout());
    let completed = form.run(&predictor, &metrics)?;

    info!(completed, "Session finished");
    metrics.print_summary();

    Ok(())
}
