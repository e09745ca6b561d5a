//! Market data types: candles, fetch intervals and aligned series

mod candle;
mod interval;
mod series;

pub use candle::Candle;
pub use interval::Interval;
pub use series::{IndicatorSeries, PriceSeries};
