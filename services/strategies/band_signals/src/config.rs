//! Strategy configuration
//!
//! One TOML file configures the whole service. Every section has compiled-in
//! defaults matching the canonical rule set, so an empty file plus API keys is a
//! runnable configuration.

use adapter_service::{MarketDataConfig, TelegramConfig};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use service_config::{defaults, load_config_file, HealthConfig, LoggingConfig, ENV_PREFIX};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use types::Interval;

use crate::error::{Result, StrategyError};

/// Top-level service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub logging: LoggingConfig,
    pub health: HealthConfig,
    pub market_data: MarketDataConfig,
    pub telegram: TelegramConfig,
    pub strategy: StrategyConfig,
}

impl ServiceConfig {
    /// Load defaults, the file at `path` and `BANDWATCH__*` overrides, then expand secrets
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = load_config_file(path, ENV_PREFIX, Self::default())?;
        config
            .market_data
            .resolve_secrets()
            .context("Failed to resolve market data API keys")?;
        config
            .telegram
            .resolve_secrets()
            .context("Failed to resolve Telegram credentials")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.market_data
            .validate()
            .map_err(|e| StrategyError::configuration(e.to_string()))?;
        self.telegram
            .validate()
            .map_err(|e| StrategyError::configuration(e.to_string()))?;
        self.strategy.validate()?;

        if self.market_data.min_candles < self.strategy.indicators.warm_up_len() {
            tracing::warn!(
                "market_data.min_candles ({}) is below the indicator warm-up ({}); short series will classify as insufficient warm-up",
                self.market_data.min_candles,
                self.strategy.indicators.warm_up_len()
            );
        }
        Ok(())
    }
}

/// When a new classification is announced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Only when the direction differs from the last announced one
    #[default]
    DirectionChange,
    /// Also when a buy/sell repeats on a newer candle
    DirectionOrTimestamp,
}

/// Stop-loss source for reversal setups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReversalStop {
    /// Fast candle low for a buy, high for a sell
    #[default]
    FastExtreme,
    /// Open of the slow candle
    SlowOpen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Instruments in Twelve Data notation, e.g. `XAU/USD`
    pub symbols: Vec<String>,

    /// Entry timeframe
    pub fast_interval: Interval,

    /// Confirmation timeframe
    pub slow_interval: Interval,

    /// Pause between passes over all symbols
    pub poll_interval_secs: u64,

    pub notify_policy: NotifyPolicy,

    pub indicators: IndicatorConfig,

    pub rules: RuleConfig,

    /// Per-symbol threshold adjustments, matched case-insensitively
    pub overrides: HashMap<String, RuleOverride>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["XAU/USD".to_string()],
            fast_interval: Interval::FiveMinutes,
            slow_interval: Interval::OneHour,
            poll_interval_secs: defaults::strategies::POLL_INTERVAL_SECS,
            notify_policy: NotifyPolicy::DirectionChange,
            indicators: IndicatorConfig::default(),
            rules: RuleConfig::default(),
            overrides: HashMap::new(),
        }
    }
}

impl StrategyConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Rules for `symbol` with any matching override applied
    pub fn rules_for(&self, symbol: &str) -> RuleConfig {
        let mut rules = self.rules.clone();
        let found = self
            .overrides
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(symbol))
            .map(|(_, value)| value);

        if let Some(over) = found {
            if let Some(low) = over.rsi_low {
                rules.rsi_low = low;
            }
            if let Some(high) = over.rsi_high {
                rules.rsi_high = high;
            }
            if let Some(buffer) = over.band_buffer {
                rules.band_buffer = buffer;
            }
        }
        rules
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbols.iter().all(|s| s.trim().is_empty()) {
            return Err(StrategyError::configuration(
                "strategy.symbols must list at least one symbol",
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(StrategyError::configuration(
                "strategy.poll_interval_secs must be greater than 0",
            ));
        }

        self.indicators.validate()?;
        self.rules.validate("strategy.rules")?;
        if self.rules.macd_confirmation && !self.indicators.macd_enabled {
            return Err(StrategyError::configuration(
                "strategy.rules.macd_confirmation requires strategy.indicators.macd_enabled",
            ));
        }

        for symbol in self.overrides.keys() {
            self.rules_for(symbol)
                .validate(&format!("strategy.overrides.{}", symbol))?;
            if !self.symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol)) {
                tracing::warn!("Override for {} does not match any configured symbol", symbol);
            }
        }
        Ok(())
    }
}

/// Indicator parameters shared by both timeframes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub bb_window: usize,
    /// Standard deviations between the mid band and each outer band
    pub bb_width: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    /// Compute MACD at all; required when `rules.macd_confirmation` is set
    pub macd_enabled: bool,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            bb_window: 20,
            bb_width: 2.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            macd_enabled: false,
        }
    }
}

impl IndicatorConfig {
    /// Candles needed before RSI and Bollinger are defined at the last index
    pub fn warm_up_len(&self) -> usize {
        (self.rsi_period + 1).max(self.bb_window)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rsi_period == 0 || self.bb_window == 0 {
            return Err(StrategyError::configuration(
                "strategy.indicators periods must be greater than 0",
            ));
        }
        if !(self.bb_width.is_finite() && self.bb_width > 0.0) {
            return Err(StrategyError::configuration(
                "strategy.indicators.bb_width must be a positive number",
            ));
        }
        if self.macd_enabled {
            if self.macd_fast == 0 || self.macd_slow == 0 || self.macd_signal == 0 {
                return Err(StrategyError::configuration(
                    "strategy.indicators MACD periods must be greater than 0",
                ));
            }
            if self.macd_fast >= self.macd_slow {
                return Err(StrategyError::configuration(format!(
                    "strategy.indicators.macd_fast ({}) must be below macd_slow ({})",
                    self.macd_fast, self.macd_slow
                )));
            }
        }
        Ok(())
    }
}

/// Decision thresholds and rule switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Both timeframes below this RSI pass the gate
    pub rsi_low: f64,
    /// Both timeframes above this RSI pass the gate
    pub rsi_high: f64,
    /// Price offset that narrows each outer band inward before comparison
    pub band_buffer: f64,
    pub reversal_stop: ReversalStop,
    /// Discard trend setups whose TP or SL the fast candle already touched
    pub guard_trend: bool,
    /// Same for reversal setups
    pub guard_reversal: bool,
    /// Require fast MACD above (buy) or below (sell) its signal line
    pub macd_confirmation: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            rsi_low: 45.0,
            rsi_high: 55.0,
            band_buffer: 0.0,
            reversal_stop: ReversalStop::FastExtreme,
            guard_trend: true,
            guard_reversal: false,
            macd_confirmation: false,
        }
    }
}

impl RuleConfig {
    fn validate(&self, section: &str) -> Result<()> {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        if !in_range(self.rsi_low) || !in_range(self.rsi_high) {
            return Err(StrategyError::configuration(format!(
                "{}: RSI thresholds must lie within 0..100",
                section
            )));
        }
        if self.rsi_low >= self.rsi_high {
            return Err(StrategyError::configuration(format!(
                "{}: rsi_low ({}) must be below rsi_high ({})",
                section, self.rsi_low, self.rsi_high
            )));
        }
        if !(self.band_buffer.is_finite() && self.band_buffer >= 0.0) {
            return Err(StrategyError::configuration(format!(
                "{}: band_buffer must be a non-negative number",
                section
            )));
        }
        Ok(())
    }
}

/// Per-symbol override; unset fields keep the global value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOverride {
    pub rsi_low: Option<f64>,
    pub rsi_high: Option<f64>,
    pub band_buffer: Option<f64>,
}
