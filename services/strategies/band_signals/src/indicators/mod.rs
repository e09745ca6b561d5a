//! Technical indicators for signal generation
//!
//! Pure functions over a slice of closes. Every output is an [`IndicatorSeries`]
//! with the same length as its input; values are absent only in the warm-up
//! prefix.

mod bollinger;
mod macd;
mod rsi;

pub use bollinger::{bollinger, BollingerBands};
pub use macd::{ema, macd, Macd};
pub use rsi::{rsi, RSI_EPSILON};

use types::{IndicatorSeries, PriceSeries};

use crate::config::IndicatorConfig;

/// Indicators computed for one price series
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub rsi: IndicatorSeries,
    pub bollinger: BollingerBands,
    /// Present only when MACD is enabled
    pub macd: Option<Macd>,
}

impl IndicatorSet {
    pub fn compute(series: &PriceSeries, config: &IndicatorConfig) -> Self {
        let closes = series.closes();
        Self::from_closes(&closes, config)
    }

    pub fn from_closes(closes: &[f64], config: &IndicatorConfig) -> Self {
        Self {
            rsi: rsi(closes, config.rsi_period),
            bollinger: bollinger(closes, config.bb_window, config.bb_width),
            macd: config.macd_enabled.then(|| {
                macd(
                    closes,
                    config.macd_fast,
                    config.macd_slow,
                    config.macd_signal,
                )
            }),
        }
    }

    /// Every contained series has length `len`
    pub fn is_aligned_with(&self, len: usize) -> bool {
        self.rsi.len() == len
            && self.bollinger.len() == len
            && self.bollinger.upper.len() == len
            && self.bollinger.lower.len() == len
            && self.macd.as_ref().map_or(true, |m| {
                m.line.len() == len && m.signal.len() == len && m.histogram.len() == len
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Absent values form a prefix: once defined, a series stays defined
    fn absent_only_in_prefix(series: &IndicatorSeries) -> bool {
        match series.first_defined() {
            Some(start) => series.iter().skip(start).all(|v| v.is_some()),
            None => true,
        }
    }

    fn macd_config() -> IndicatorConfig {
        IndicatorConfig {
            macd_enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_macd_only_when_enabled() {
        let closes: Vec<f64> = (0..50).map(|i| i as f64).collect();

        let without = IndicatorSet::from_closes(&closes, &IndicatorConfig::default());
        assert!(without.macd.is_none());

        let with = IndicatorSet::from_closes(&closes, &macd_config());
        assert!(with.macd.is_some());
        assert!(with.is_aligned_with(50));
        assert!(!with.is_aligned_with(49));
    }

    proptest! {
        #[test]
        fn prop_outputs_align_with_input(
            closes in prop::collection::vec(1.0f64..10_000.0, 0..120)
        ) {
            let set = IndicatorSet::from_closes(&closes, &macd_config());
            prop_assert!(set.is_aligned_with(closes.len()));

            let macd = set.macd.as_ref().unwrap();
            for series in [
                &set.rsi,
                &set.bollinger.mid,
                &set.bollinger.upper,
                &set.bollinger.lower,
                &macd.line,
                &macd.signal,
                &macd.histogram,
            ] {
                prop_assert!(absent_only_in_prefix(series));
            }

            if closes.len() > 14 {
                prop_assert_eq!(set.rsi.first_defined(), Some(14));
            } else {
                prop_assert_eq!(set.rsi.defined_count(), 0);
            }
            if closes.len() >= 20 {
                prop_assert_eq!(set.bollinger.mid.first_defined(), Some(19));
            }
        }

        #[test]
        fn prop_rsi_stays_in_range(
            closes in prop::collection::vec(0.01f64..1_000_000.0, 15..200),
            period in 1usize..30
        ) {
            for value in rsi(&closes, period).iter().flatten() {
                prop_assert!(value.is_finite());
                prop_assert!((0.0..=100.0).contains(&value));
            }
        }
    }
}
