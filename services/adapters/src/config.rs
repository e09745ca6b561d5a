//! Configuration for the market data and notification adapters
//!
//! Both sections deserialize from the service's TOML file; credentials may be
//! written as `${VAR}` and are expanded by [`MarketDataConfig::resolve_secrets`]
//! and [`TelegramConfig::resolve_secrets`] before the adapters are built.

use serde::{Deserialize, Serialize};
use service_config::defaults;
use std::time::Duration;

use crate::{AdapterError, Result};

/// Twelve Data time-series adapter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// REST endpoint, overridable for tests
    pub base_url: String,

    /// Keys tried in order on every fetch
    pub api_keys: Vec<String>,

    /// Per-key allowance; 0 disables client-side limiting
    pub requests_per_minute: u32,

    pub timeout_secs: u64,

    /// Candles requested per fetch
    pub output_size: usize,

    /// Shorter series are treated as unavailable
    pub min_candles: usize,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::market_data::BASE_URL.to_string(),
            api_keys: Vec::new(),
            requests_per_minute: defaults::market_data::REQUESTS_PER_MINUTE,
            timeout_secs: defaults::market_data::TIMEOUT_SECS,
            output_size: defaults::market_data::OUTPUT_SIZE,
            min_candles: defaults::market_data::MIN_CANDLES,
        }
    }
}

impl MarketDataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Expand `${VAR}` references in the API keys, dropping keys that expand empty
    pub fn resolve_secrets(&mut self) -> Result<()> {
        self.api_keys = service_config::expand_env_list(&self.api_keys)
            .map_err(|e| AdapterError::Configuration(format!("{:#}", e)))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_keys.iter().all(|key| key.trim().is_empty()) {
            return Err(AdapterError::Configuration(
                "market_data.api_keys must contain at least one non-empty key".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(AdapterError::Configuration(
                "market_data.base_url must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(AdapterError::Configuration(
                "market_data.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.output_size == 0 {
            return Err(AdapterError::Configuration(
                "market_data.output_size must be greater than 0".to_string(),
            ));
        }
        if self.min_candles > self.output_size {
            return Err(AdapterError::Configuration(format!(
                "market_data.min_candles ({}) exceeds output_size ({})",
                self.min_candles, self.output_size
            )));
        }
        Ok(())
    }
}

/// Telegram Bot API notifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// When false, notifications go to the log instead
    pub enabled: bool,
    pub base_url: String,
    pub bot_token: String,
    pub chat_id: String,
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: defaults::telegram::BASE_URL.to_string(),
            bot_token: String::new(),
            chat_id: String::new(),
            timeout_secs: defaults::telegram::TIMEOUT_SECS,
        }
    }
}

impl TelegramConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resolve_secrets(&mut self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let expand = |value: &str| {
            service_config::expand_env(value)
                .map_err(|e| AdapterError::Configuration(format!("{:#}", e)))
        };
        self.bot_token = expand(&self.bot_token)?;
        self.chat_id = expand(&self.chat_id)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.bot_token.trim().is_empty() {
            return Err(AdapterError::Configuration(
                "telegram.bot_token is required when telegram is enabled".to_string(),
            ));
        }
        if self.chat_id.trim().is_empty() {
            return Err(AdapterError::Configuration(
                "telegram.chat_id is required when telegram is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
