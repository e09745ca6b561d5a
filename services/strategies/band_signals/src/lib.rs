//! # Band Signals Strategy
//!
//! Polls candles for a list of symbols on two timeframes and announces buy, sell
//! and wait calls when they change.
//!
//! ## Architecture Role
//!
//! ```text
//! Twelve Data REST → [Indicators] → [Classifier] → [Change Detector] → Telegram
//!   fast + slow        RSI, BB,       trend and       last direction      or log
//!   candles            MACD           reversal rules  per symbol
//! ```
//!
//! ## Pipeline
//!
//! - **Indicators**: Wilder RSI, Bollinger Bands (population deviation) and MACD,
//!   each aligned index-for-index with its input and undefined in the warm-up prefix
//! - **Classifier**: a pure function of both timeframes and the rule set; an RSI
//!   gate, then the trend rule, then the reversal rule, with optional MACD
//!   confirmation and an already-triggered guard
//! - **Change Detection**: only a new direction (or, by policy, a new candle for an
//!   actionable call) produces a notification
//! - **Poll Loop**: symbols are processed sequentially; one failing symbol never
//!   stops the pass

pub mod change_detector;
pub mod classifier;
pub mod config;
pub mod error;
pub mod indicators;
pub mod notification;
pub mod signals;
pub mod strategy;

pub use change_detector::{ChangeDetector, EmittedSignal, LastSignalState};
pub use classifier::{classify, Timeframe};
pub use config::{
    IndicatorConfig, NotifyPolicy, ReversalStop, RuleConfig, RuleOverride, ServiceConfig,
    StrategyConfig,
};
pub use error::{Result, StrategyError};
pub use indicators::IndicatorSet;
pub use notification::format_message;
pub use signals::SignalStats;
pub use strategy::{BandSignalStrategy, PassSummary};
