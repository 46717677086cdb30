//! Tracing subscriber setup shared by the binaries

use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Build the log filter: `RUST_LOG` wins, otherwise the configured level for this crate
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = format!("fuel_efficiency_predictor={}", config.level);
    Ok(EnvFilter::new("warn").add_directive(
        directive
            .parse()
            .with_context(|| format!("Invalid log level '{}'", config.level))?,
    ))
}

/// Initialize logging to stderr in the configured format (pretty or json)
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "very loud".to_string(),
            format: "pretty".to_string(),
        };
        assert!(env_filter(&config).is_err());
    }

    #[test]
    fn test_configured_level_is_accepted() {
        let config = LoggingConfig::default();
        assert!(env_filter(&config).is_ok());
    }
}
