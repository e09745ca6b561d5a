//! Standardized logging setup for strategy binaries

use anyhow::{anyhow, Result};
use service_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the level filter: `RUST_LOG` wins, otherwise the configured level
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| anyhow!("Invalid log level '{}': {}", config.level, e)),
    }
}

/// Install the global subscriber for a strategy service
///
/// Fails when a subscriber is already installed.
pub fn init_strategy_logging(service_name: &str, config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false),
            )
            .try_init(),
    }
    .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!(service = service_name, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig {
            level: "band_signals=verbose".to_string(),
            ..Default::default()
        };
        assert!(build_env_filter(&config).is_err());
    }

    #[test]
    fn test_level_with_directives() {
        let config = LoggingConfig {
            level: "info,band_signals=debug".to_string(),
            ..Default::default()
        };
        assert!(build_env_filter(&config).is_ok());
    }
}
