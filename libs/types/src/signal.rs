//! Trading signal definitions
//!
//! A [`Signal`] is produced fresh by every classification and never mutated.
//! Trade levels exist only on buy/sell signals; a reason exists only on wait
//! signals, and the plain "no setup" wait carries none.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Buy,
    Sell,
    Wait,
}

impl Direction {
    /// Buy or sell
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Direction::Wait)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "buy",
            Direction::Sell => "sell",
            Direction::Wait => "wait",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule family produced an actionable signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupKind {
    /// Continuation confirmed by a quiet, contained slow timeframe
    Trend,
    /// Mean reversion after an outer-band overextension
    Reversal,
}

impl fmt::Display for SetupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupKind::Trend => f.write_str("trend"),
            SetupKind::Reversal => f.write_str("reversal"),
        }
    }
}

/// Why a classification ended in `wait`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitReason {
    NoData,
    InsufficientWarmup,
    WeakRsi,
    MacdUnconfirmed,
    AlreadyTriggered,
}

impl fmt::Display for WaitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WaitReason::NoData => "no data",
            WaitReason::InsufficientWarmup => "insufficient warm-up",
            WaitReason::WeakRsi => "weak rsi",
            WaitReason::MacdUnconfirmed => "macd unconfirmed",
            WaitReason::AlreadyTriggered => "already triggered",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeLevels {
    pub entry: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Instrument this signal applies to
    pub symbol: String,

    /// Time of the fast timeframe's last candle, absent when no data was available
    pub timestamp: Option<DateTime<Utc>>,

    pub direction: Direction,

    /// Rule family, only for buy/sell
    pub strategy: Option<SetupKind>,

    /// Entry, take profit and stop loss, only for buy/sell
    pub levels: Option<TradeLevels>,

    /// Only for wait
    pub reason: Option<WaitReason>,
}

impl Signal {
    /// Wait signal with an explicit reason
    pub fn wait(
        symbol: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
        reason: WaitReason,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            direction: Direction::Wait,
            strategy: None,
            levels: None,
            reason: Some(reason),
        }
    }

    /// Wait signal when no rule matched
    pub fn no_setup(symbol: impl Into<String>, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            direction: Direction::Wait,
            strategy: None,
            levels: None,
            reason: None,
        }
    }

    /// Buy signal from a matched setup
    pub fn buy(
        symbol: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
        strategy: SetupKind,
        levels: TradeLevels,
    ) -> Self {
        Self::actionable(symbol, timestamp, Direction::Buy, strategy, levels)
    }

    /// Sell signal from a matched setup
    pub fn sell(
        symbol: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
        strategy: SetupKind,
        levels: TradeLevels,
    ) -> Self {
        Self::actionable(symbol, timestamp, Direction::Sell, strategy, levels)
    }

    fn actionable(
        symbol: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
        direction: Direction,
        strategy: SetupKind,
        levels: TradeLevels,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            direction,
            strategy: Some(strategy),
            levels: Some(levels),
            reason: None,
        }
    }

    pub fn is_wait(&self) -> bool {
        self.direction == Direction::Wait
    }
}
