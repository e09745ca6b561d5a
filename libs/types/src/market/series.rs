use super::{Candle, Interval};
use crate::SeriesError;
use serde::{Deserialize, Serialize};

/// Ordered candles for one `(symbol, interval)` pair
///
/// Timestamps are strictly increasing and every OHLC value is finite; the most
/// recent candle is the last element. Gaps between candles are not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    interval: Interval,
    candles: Vec<Candle>,
}

impl PriceSeries {
    pub fn new(
        symbol: impl Into<String>,
        interval: Interval,
        candles: Vec<Candle>,
    ) -> Result<Self, SeriesError> {
        for (index, candle) in candles.iter().enumerate() {
            if let Some((field, value)) = candle
                .fields()
                .into_iter()
                .find(|(_, value)| !value.is_finite())
            {
                return Err(SeriesError::NonFinitePrice {
                    index,
                    field,
                    value,
                });
            }
        }

        for (index, pair) in candles.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(SeriesError::NonIncreasingTimestamp {
                    index: index + 1,
                    previous: pair[0].timestamp.to_rfc3339(),
                    current: pair[1].timestamp.to_rfc3339(),
                });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            interval,
            candles,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}

/// Indicator output aligned index-for-index with its source series
///
/// `None` marks indices inside the indicator's warm-up window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSeries(Vec<Option<f64>>);

impl IndicatorSeries {
    /// Series of `len` absent values
    pub fn undefined(len: usize) -> Self {
        Self(vec![None; len])
    }

    /// Series of `len` with values only at the given indices
    pub fn from_sparse(len: usize, points: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut series = Self::undefined(len);
        for (index, value) in points {
            if index < len {
                series.set(index, value);
            }
        }
        series
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    /// Value at the most recent index, if defined
    pub fn last(&self) -> Option<f64> {
        self.0.last().copied().flatten()
    }

    /// Index of the first defined value
    pub fn first_defined(&self) -> Option<usize> {
        self.0.iter().position(Option::is_some)
    }

    pub fn defined_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_some()).count()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Panics when `index` is out of bounds
    pub fn set(&mut self, index: usize, value: f64) {
        self.0[index] = Some(value);
    }
}

impl From<Vec<Option<f64>>> for IndicatorSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn candle_at(minute: u32, close: f64) -> Candle {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 9, minute, 0).unwrap();
        Candle::new(t, close, close + 1.0, close - 1.0, close)
    }

    #[test]
    fn test_series_accepts_increasing_timestamps() {
        let series = PriceSeries::new(
            "EUR/USD",
            Interval::FiveMinutes,
            vec![candle_at(0, 1.0), candle_at(5, 2.0), candle_at(10, 3.0)],
        )
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.last().unwrap().close, 3.0);
        assert_eq!(series.symbol(), "EUR/USD");
    }

    #[test]
    fn test_series_rejects_duplicate_timestamp() {
        let err = PriceSeries::new(
            "EUR/USD",
            Interval::FiveMinutes,
            vec![candle_at(0, 1.0), candle_at(5, 2.0), candle_at(5, 3.0)],
        )
        .unwrap_err();

        assert!(matches!(err, SeriesError::NonIncreasingTimestamp { index: 2, .. }));
    }

    #[test]
    fn test_series_rejects_nan_price() {
        let mut bad = candle_at(5, 2.0);
        bad.high = f64::NAN;
        let err = PriceSeries::new("EUR/USD", Interval::FiveMinutes, vec![candle_at(0, 1.0), bad])
            .unwrap_err();

        assert!(matches!(
            err,
            SeriesError::NonFinitePrice {
                index: 1,
                field: "high",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_series_is_valid() {
        let series = PriceSeries::new("EUR/USD", Interval::OneHour, Vec::new()).unwrap();
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }

    #[test]
    fn test_indicator_series_accessors() {
        let series = IndicatorSeries::from_sparse(5, [(3, 1.5), (4, 2.5), (9, 7.0)]);

        assert_eq!(series.len(), 5);
        assert_eq!(series.first_defined(), Some(3));
        assert_eq!(series.defined_count(), 2);
        assert_eq!(series.get(2), None);
        assert_eq!(series.get(3), Some(1.5));
        assert_eq!(series.get(42), None);
        assert_eq!(series.last(), Some(2.5));
    }
}
