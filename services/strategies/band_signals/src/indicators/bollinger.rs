use types::IndicatorSeries;

/// Mid, upper and lower bands aligned with the source closes
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub mid: IndicatorSeries,
    pub upper: IndicatorSeries,
    pub lower: IndicatorSeries,
}

impl BollingerBands {
    /// `(mid, upper, lower)` at `index` when all three are defined
    pub fn at(&self, index: usize) -> Option<(f64, f64, f64)> {
        Some((
            self.mid.get(index)?,
            self.upper.get(index)?,
            self.lower.get(index)?,
        ))
    }

    pub fn len(&self) -> usize {
        self.mid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mid.is_empty()
    }
}

/// Rolling mean ± `width` population standard deviations
///
/// The window at index `i` is `[i - window + 1, i]`, so the first defined
/// value is at `window - 1`.
pub fn bollinger(closes: &[f64], window: usize, width: f64) -> BollingerBands {
    let len = closes.len();
    let mut bands = BollingerBands {
        mid: IndicatorSeries::undefined(len),
        upper: IndicatorSeries::undefined(len),
        lower: IndicatorSeries::undefined(len),
    };
    if window == 0 || len < window {
        return bands;
    }

    let n = window as f64;
    for (offset, slice) in closes.windows(window).enumerate() {
        let index = offset + window - 1;
        let mean = slice.iter().sum::<f64>() / n;
        let variance = (slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).max(0.0);
        let deviation = width * variance.sqrt();

        bands.mid.set(index, mean);
        bands.upper.set(index, mean + deviation);
        bands.lower.set(index, mean - deviation);
    }

    bands
}
