//! # Bandwatch Adapters
//!
//! ## Purpose
//!
//! Boundary between the signal service and the outside world: pulls OHLC candles
//! from the Twelve Data REST API and pushes notification text to Telegram. Both
//! sides sit behind small async traits so the strategy loop can be exercised
//! against in-memory fakes.
//!
//! ## Integration Points
//!
//! - **Input**: [`CandleSource`], implemented by [`TwelveDataClient`] with ordered
//!   API-key fallback and per-key rate limiting
//! - **Output**: [`Notifier`], implemented by [`TelegramNotifier`] and [`LogNotifier`]
//! - **Configuration**: [`MarketDataConfig`] and [`TelegramConfig`] sections of the
//!   service TOML file
//!
//! ## Failure Model
//!
//! - A failing key is logged by position (never by value) and the next key is tried
//! - All keys failing, or too few candles, is `Ok(None)`: the caller treats the
//!   symbol as having no data this pass
//! - Malformed candle content is an `Err` the caller logs per symbol
//! - Notification failures are logged and dropped by [`Notifier::notify`]

pub mod config;
pub mod error;
pub mod market_data;
pub mod notify;
pub mod rate_limit;

pub use config::{MarketDataConfig, TelegramConfig};
pub use error::{AdapterError, Result};
pub use market_data::{CandleSource, TwelveDataClient};
pub use notify::{LogNotifier, Notifier, TelegramNotifier};
pub use rate_limit::{KeyRateLimiter, KeyUsageSnapshot};
