//! # Bandwatch Types Library
//!
//! Shared type system for the Bandwatch signal services.
//!
//! ## Design Philosophy
//!
//! - **Validated Series**: a [`PriceSeries`] can only be built from candles with strictly
//!   increasing timestamps and finite prices, so downstream math never re-checks ordering
//! - **Explicit Absence**: indicator values that are not yet defined are `None` inside an
//!   [`IndicatorSeries`], never a sentinel number
//! - **Signals Carry Their Own Invariants**: trade levels exist only on buy/sell signals,
//!   wait reasons only on wait signals
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use types::{Candle, Interval, PriceSeries};
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
//! let candles = vec![
//!     Candle::new(t0, 10.0, 11.0, 9.5, 10.5),
//!     Candle::new(t0 + Interval::FiveMinutes.duration(), 10.5, 10.9, 10.1, 10.2),
//! ];
//! let series = PriceSeries::new("XAU/USD", Interval::FiveMinutes, candles).unwrap();
//! assert_eq!(series.closes(), vec![10.5, 10.2]);
//! ```

pub mod common;
pub mod market;
pub mod signal;

pub use common::errors::SeriesError;
pub use market::{Candle, IndicatorSeries, Interval, PriceSeries};
pub use signal::{Direction, SetupKind, Signal, TradeLevels, WaitReason};
