use types::IndicatorSeries;

/// Stand-in for a zero average loss, and for a zero average gain on a flat series
///
/// Keeps RSI total: a series with no losses approaches 100 instead of dividing by
/// zero, and a series with no movement at all yields exactly 50.
pub const RSI_EPSILON: f64 = 1e-10;

/// Wilder's smoothed RSI
///
/// The seed averages are the simple means of the first `period` deltas and the
/// seed value sits at index `period`; later values use Wilder smoothing. The
/// output is absent below index `period`, and entirely absent when there are
/// fewer than `period + 1` closes.
pub fn rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    let mut output = IndicatorSeries::undefined(closes.len());
    if period == 0 || closes.len() <= period {
        return output;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for window in closes[..=period].windows(2) {
        let delta = window[1] - window[0];
        if delta > 0.0 {
            avg_gain += delta;
        } else {
            avg_loss -= delta;
        }
    }
    let p = period as f64;
    avg_gain /= p;
    avg_loss /= p;
    output.set(period, rsi_from_averages(avg_gain, avg_loss));

    for i in (period + 1)..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;
        output.set(i, rsi_from_averages(avg_gain, avg_loss));
    }

    output
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let (gain, loss) = if avg_loss == 0.0 {
        let gain = if avg_gain == 0.0 { RSI_EPSILON } else { avg_gain };
        (gain, RSI_EPSILON)
    } else {
        (avg_gain, avg_loss)
    };
    100.0 - 100.0 / (1.0 + gain / loss)
}
