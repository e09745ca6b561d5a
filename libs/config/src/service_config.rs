//! Service Configuration Module
//!
//! Provides configuration loading for Bandwatch services. A service hands in its
//! compiled-in defaults; a TOML file and then `PREFIX__SECTION__KEY` environment
//! variables are layered on top.

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::defaults;

/// Environment override prefix shared by all services
pub const ENV_PREFIX: &str = "BANDWATCH";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings; `RUST_LOG` takes precedence over `level` when set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Liveness endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: defaults::health::PORT,
        }
    }
}

/// Resolve the config file path from an environment variable, falling back to `default`
pub fn resolve_config_path(env_var: &str, default: &str) -> PathBuf {
    match std::env::var(env_var) {
        Ok(path) if !path.trim().is_empty() => {
            debug!("Config path taken from {}: {}", env_var, path);
            PathBuf::from(path)
        }
        _ => PathBuf::from(default),
    }
}

/// Load a service configuration
///
/// Layers, lowest priority first: `defaults`, the TOML file at `path` (skipped with a
/// warning when missing), environment variables named `{prefix}__SECTION__KEY`.
pub fn load_config_file<T>(path: &Path, prefix: &str, defaults: T) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let base = Config::try_from(&defaults).context("Failed to serialize default configuration")?;

    let mut builder = Config::builder().add_source(base);

    if path.exists() {
        info!("Loading configuration from {:?}", path);
        builder = builder.add_source(File::from(path).required(true));
    } else {
        warn!("Config file {:?} not found, using defaults", path);
    }

    builder = builder.add_source(
        Environment::with_prefix(prefix)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build().context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Expand `${VAR}` references in a single value
pub fn expand_env(value: &str) -> Result<String> {
    let expanded = shellexpand::env(value)
        .with_context(|| format!("Failed to expand environment references in '{}'", value))?;
    Ok(expanded.into_owned())
}

/// Expand every entry, dropping entries that expand to an empty string
pub fn expand_env_list(values: &[String]) -> Result<Vec<String>> {
    let mut expanded = Vec::with_capacity(values.len());
    for value in values {
        let value = expand_env(value)?;
        if !value.trim().is_empty() {
            expanded.push(value);
        }
    }
    Ok(expanded)
}
