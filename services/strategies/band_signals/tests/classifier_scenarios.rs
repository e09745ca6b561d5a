//! End-to-end classification over computed indicators

use band_signals::indicators::{bollinger, BollingerBands};
use band_signals::{classify, IndicatorConfig, IndicatorSet, RuleConfig, Timeframe};
use chrono::{DateTime, TimeZone, Utc};
use types::{Candle, Direction, IndicatorSeries, Interval, PriceSeries, SetupKind, WaitReason};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap()
}

/// Straight-line series ending at `last_close`; positive `step` rises
fn trending(interval: Interval, len: usize, last_close: f64, step: f64) -> PriceSeries {
    let candles = (0..len)
        .map(|i| {
            let close = last_close - (len - 1 - i) as f64 * step;
            let open = close - step;
            Candle::new(
                start() + interval.duration() * i as i32,
                open,
                open.max(close) + step.abs() / 2.0,
                open.min(close) - step.abs() / 2.0,
                close,
            )
        })
        .collect();
    PriceSeries::new("EUR/USD", interval, candles).unwrap()
}

fn flat(interval: Interval, len: usize, price: f64) -> PriceSeries {
    let candles = (0..len)
        .map(|i| {
            Candle::new(
                start() + interval.duration() * i as i32,
                price,
                price + 0.5,
                price - 0.5,
                price,
            )
        })
        .collect();
    PriceSeries::new("EUR/USD", interval, candles).unwrap()
}

fn run(fast: &PriceSeries, slow: &PriceSeries) -> types::Signal {
    let config = IndicatorConfig::default();
    let fast_set = IndicatorSet::compute(fast, &config);
    let slow_set = IndicatorSet::compute(slow, &config);
    classify(
        "EUR/USD",
        &Timeframe::new(fast, &fast_set),
        &Timeframe::new(slow, &slow_set),
        &RuleConfig::default(),
    )
}

#[test]
fn falling_market_sells_the_trend() {
    let fast = trending(Interval::FiveMinutes, 60, 100.0, -0.2);
    let slow = trending(Interval::OneHour, 60, 100.0, -1.0);

    let signal = run(&fast, &slow);

    assert_eq!(signal.direction, Direction::Sell);
    assert_eq!(signal.strategy, Some(SetupKind::Trend));
    assert_eq!(signal.timestamp, Some(fast.last().unwrap().timestamp));

    let levels = signal.levels.unwrap();
    assert!((levels.entry - 100.0).abs() < 1e-9);
    // Lower band of the last 20 fast closes: mid 101.9, sigma 0.2 * sqrt(399 / 12)
    let expected_tp = 101.9 - 2.0 * 0.2 * (399.0f64 / 12.0).sqrt();
    assert!((levels.take_profit - expected_tp).abs() < 1e-9);
    assert!((levels.stop_loss - 101.0).abs() < 1e-9);
}

#[test]
fn rising_market_buys_the_trend() {
    let fast = trending(Interval::FiveMinutes, 60, 100.0, 0.2);
    let slow = trending(Interval::OneHour, 60, 100.0, 1.0);

    let signal = run(&fast, &slow);

    assert_eq!(signal.direction, Direction::Buy);
    assert_eq!(signal.strategy, Some(SetupKind::Trend));
    let levels = signal.levels.unwrap();
    assert!(levels.take_profit > levels.entry);
    assert!((levels.stop_loss - 99.0).abs() < 1e-9);
}

#[test]
fn neutral_rsi_waits() {
    let fast = flat(Interval::FiveMinutes, 60, 100.0);
    let slow = flat(Interval::OneHour, 60, 100.0);

    let signal = run(&fast, &slow);

    assert_eq!(signal.direction, Direction::Wait);
    assert_eq!(signal.reason, Some(WaitReason::WeakRsi));
}

#[test]
fn disagreeing_timeframes_wait() {
    // Fast RSI near 0, slow RSI near 100
    let fast = trending(Interval::FiveMinutes, 60, 100.0, -0.2);
    let slow = trending(Interval::OneHour, 60, 100.0, 1.0);

    let signal = run(&fast, &slow);

    assert_eq!(signal.reason, Some(WaitReason::WeakRsi));
}

#[test]
fn short_history_needs_warmup() {
    let fast = trending(Interval::FiveMinutes, 12, 100.0, -0.2);
    let slow = trending(Interval::OneHour, 60, 100.0, -1.0);

    let signal = run(&fast, &slow);

    assert_eq!(signal.reason, Some(WaitReason::InsufficientWarmup));
}

#[test]
fn classification_is_deterministic() {
    let fast = trending(Interval::FiveMinutes, 60, 100.0, -0.2);
    let slow = trending(Interval::OneHour, 60, 100.0, -1.0);

    assert_eq!(run(&fast, &slow), run(&fast, &slow));
}

#[test]
fn constant_closes_collapse_the_bands() {
    let bands = bollinger(&[10.0; 20], 20, 2.0);

    assert_eq!(bands.at(19), Some((10.0, 10.0, 10.0)));
    assert_eq!(bands.at(18), None);
}

#[test]
fn oversold_quiet_uptrend_buys() {
    // RSI 40 on both timeframes, fast above mid and below upper, slow bullish and
    // contained
    let t = Utc.with_ymd_and_hms(2024, 5, 6, 14, 35, 0).unwrap();
    let fast = PriceSeries::new(
        "XAU/USD",
        Interval::FiveMinutes,
        vec![Candle::new(t, 101.0, 103.0, 100.5, 102.0)],
    )
    .unwrap();
    let slow = PriceSeries::new(
        "XAU/USD",
        Interval::OneHour,
        vec![Candle::new(t, 98.0, 103.0, 97.0, 102.0)],
    )
    .unwrap();

    let one = |v: f64| IndicatorSeries::from(vec![Some(v)]);
    let bands = |mid: f64, upper: f64, lower: f64| BollingerBands {
        mid: one(mid),
        upper: one(upper),
        lower: one(lower),
    };
    let fast_set = IndicatorSet {
        rsi: one(40.0),
        bollinger: bands(100.0, 105.0, 95.0),
        macd: None,
    };
    let slow_set = IndicatorSet {
        rsi: one(40.0),
        bollinger: bands(100.0, 110.0, 90.0),
        macd: None,
    };

    let signal = classify(
        "XAU/USD",
        &Timeframe::new(&fast, &fast_set),
        &Timeframe::new(&slow, &slow_set),
        &RuleConfig::default(),
    );

    assert_eq!(signal.direction, Direction::Buy);
    assert_eq!(signal.strategy, Some(SetupKind::Trend));
    let levels = signal.levels.unwrap();
    assert_eq!(levels.entry, 102.0);
    assert_eq!(levels.take_profit, 105.0);
    assert_eq!(levels.stop_loss, 98.0);
    assert_eq!(signal.timestamp, Some(t));
}
