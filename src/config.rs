//! Configuration management for the fuel-efficiency predictor

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Serialized format of the fitted scaler and regressor
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Standard-scaler and linear-regressor parameters as JSON
    #[default]
    Json,
    /// scikit-learn pipeline stages exported to ONNX
    Onnx,
}

impl ArtifactFormat {
    /// File extension used by the default artifact names
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Json => "json",
            ArtifactFormat::Onnx => "onnx",
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    pub logging: LoggingConfig,
}

/// Fitted artifact location and format
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory containing the scaler and model files
    pub base_dir: PathBuf,
    /// Artifact format: "json" or "onnx"
    pub format: ArtifactFormat,
    /// Scaler file name (default: scaler.<ext>)
    pub scaler_file: Option<String>,
    /// Model file name (default: car_mileage_model.<ext>)
    pub model_file: Option<String>,
    /// Number of threads per ONNX Runtime session
    pub onnx_threads: usize,
}

impl ArtifactsConfig {
    /// Full path of the scaler artifact
    pub fn scaler_path(&self) -> PathBuf {
        let name = self
            .scaler_file
            .clone()
            .unwrap_or_else(|| format!("scaler.{}", self.format.extension()));
        self.base_dir.join(name)
    }

    /// Full path of the regression model artifact
    pub fn model_path(&self) -> PathBuf {
        let name = self
            .model_file
            .clone()
            .unwrap_or_else(|| format!("car_mileage_model.{}", self.format.extension()));
        self.base_dir.join(name)
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("artifacts"),
            format: ArtifactFormat::Json,
            scaler_file: None,
            model_file: None,
            onnx_threads: 1,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// `MPG_SECTION__KEY` environment source
fn environment() -> Environment {
    Environment::with_prefix("MPG")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    /// Load configuration from the default file and `MPG_*` environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path, layered under the environment.
    ///
    /// The file is optional; missing keys fall back to defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::build(path.as_ref(), environment())
    }

    fn build(path: &Path, env: Environment) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
