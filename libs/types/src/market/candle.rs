use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unit of price action for a fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Interval open time (UTC)
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    /// Close strictly above open
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close strictly below open
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    pub(crate) fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_candle_direction() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let up = Candle::new(t, 100.0, 102.0, 99.0, 101.0);
        assert!(up.is_bullish());
        assert!(!up.is_bearish());

        let doji = Candle::new(t, 100.0, 101.0, 99.0, 100.0);
        assert!(!doji.is_bullish());
        assert!(!doji.is_bearish());
    }
}
