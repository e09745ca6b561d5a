//! Error types for price series validation
//!
//! Raised when candles handed to a [`crate::PriceSeries`] break the ordering or
//! finiteness invariants that the indicator math relies on.

use thiserror::Error;

/// Errors that can occur while building a price series
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    /// Candle timestamps must be strictly increasing
    #[error("Candle {index} is not after its predecessor ({current} <= {previous})")]
    NonIncreasingTimestamp {
        index: usize,
        previous: String,
        current: String,
    },

    /// OHLC values must be finite numbers
    #[error("Candle {index} has a non-finite {field}: {value}")]
    NonFinitePrice {
        index: usize,
        field: &'static str,
        value: f64,
    },

    /// Interval spelling not recognised
    #[error("Unknown interval '{input}'")]
    UnknownInterval { input: String },
}
