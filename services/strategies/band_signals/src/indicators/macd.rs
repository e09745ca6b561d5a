use types::IndicatorSeries;

/// Exponential moving average seeded with the simple mean of the first `length` values
///
/// The seed sits at index `length - 1`; earlier indices are absent.
pub fn ema(data: &[f64], length: usize) -> IndicatorSeries {
    let mut output = IndicatorSeries::undefined(data.len());
    if length == 0 || data.len() < length {
        return output;
    }

    let alpha = 2.0 / (length as f64 + 1.0);
    let mut value = data[..length].iter().sum::<f64>() / length as f64;
    output.set(length - 1, value);

    for (i, price) in data.iter().enumerate().skip(length) {
        value = alpha * price + (1.0 - alpha) * value;
        output.set(i, value);
    }

    output
}

/// MACD line, signal line and histogram aligned with the source closes
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

impl Macd {
    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }
}

/// MACD over `closes`
///
/// The line is defined from index `slow - 1`. The signal line is the EMA of the
/// defined line values mapped back onto their original indices, so it starts at
/// index `slow + signal - 2`.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let len = closes.len();
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let mut line = IndicatorSeries::undefined(len);
    let mut defined = Vec::new();
    for i in 0..len {
        if let (Some(f), Some(s)) = (fast_ema.get(i), slow_ema.get(i)) {
            line.set(i, f - s);
            defined.push((i, f - s));
        }
    }

    let compact: Vec<f64> = defined.iter().map(|&(_, value)| value).collect();
    let compact_signal = ema(&compact, signal);
    let signal_line = IndicatorSeries::from_sparse(
        len,
        defined
            .iter()
            .enumerate()
            .filter_map(|(k, &(index, _))| compact_signal.get(k).map(|value| (index, value))),
    );

    let histogram = IndicatorSeries::from_sparse(
        len,
        (0..len).filter_map(|i| Some((i, line.get(i)? - signal_line.get(i)?))),
    );

    Macd {
        line,
        signal: signal_line,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seed_and_step() {
        let series = ema(&[1.0, 2.0, 3.0, 4.0], 3);

        assert_eq!(series.first_defined(), Some(2));
        assert_eq!(series.get(2), Some(2.0));
        // alpha = 0.5: 0.5 * 4 + 0.5 * 2
        assert_eq!(series.get(3), Some(3.0));
    }

    #[test]
    fn test_ema_short_input() {
        assert_eq!(ema(&[1.0, 2.0], 3).defined_count(), 0);
        assert_eq!(ema(&[1.0, 2.0], 0).defined_count(), 0);
    }

    #[test]
    fn test_warm_up_offsets() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let result = macd(&closes, 12, 26, 9);

        assert_eq!(result.len(), 60);
        assert_eq!(result.line.first_defined(), Some(25));
        assert_eq!(result.signal.first_defined(), Some(33));
        assert_eq!(result.histogram.first_defined(), Some(33));
        assert_eq!(result.signal.defined_count(), 60 - 33);
    }

    #[test]
    fn test_constant_input_converges_to_zero() {
        let closes = vec![1.1; 80];
        let result = macd(&closes, 12, 26, 9);

        let line = result.line.last().unwrap();
        let signal = result.signal.last().unwrap();
        assert!(line.abs() < 1e-9);
        assert!(signal.abs() < 1e-9);
        assert!(result.histogram.last().unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_uptrend_has_positive_line() {
        let closes: Vec<f64> = (0..60).map(|i| 50.0 + i as f64).collect();
        let result = macd(&closes, 12, 26, 9);
        assert!(result.line.last().unwrap() > 0.0);
    }

    #[test]
    fn test_insufficient_data_for_signal() {
        let closes: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let result = macd(&closes, 12, 26, 9);

        assert_eq!(result.line.defined_count(), 5);
        assert_eq!(result.signal.defined_count(), 0);
    }
}
