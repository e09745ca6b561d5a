//! Multi-timeframe signal classifier
//!
//! [`classify`] is a pure function of its inputs: two price series, their
//! indicator sets and the rule configuration. It never reads the clock; the
//! signal timestamp is the fast series' last candle time.
//!
//! Pipeline, first match wins:
//! 1. data and warm-up preconditions
//! 2. RSI gate: both timeframes below `rsi_low` or both above `rsi_high`
//! 3. trend rule, then reversal rule
//! 4. optional MACD confirmation of the matched direction
//! 5. optional already-triggered guard per setup kind
//! 6. otherwise a plain wait with no reason

use types::{Candle, Direction, PriceSeries, SetupKind, Signal, TradeLevels, WaitReason};

use crate::config::{ReversalStop, RuleConfig};
use crate::indicators::IndicatorSet;

/// A price series paired with the indicators computed from it
#[derive(Debug, Clone, Copy)]
pub struct Timeframe<'a> {
    pub series: &'a PriceSeries,
    pub indicators: &'a IndicatorSet,
}

impl<'a> Timeframe<'a> {
    pub fn new(series: &'a PriceSeries, indicators: &'a IndicatorSet) -> Self {
        Self { series, indicators }
    }

    fn is_usable(&self) -> bool {
        !self.series.is_empty() && self.indicators.is_aligned_with(self.series.len())
    }

    /// Values at the last index, if every required indicator is defined there
    fn snapshot(&self) -> Option<Snapshot> {
        let index = self.series.len().checked_sub(1)?;
        let candle = *self.series.last()?;
        let (mid, upper, lower) = self.indicators.bollinger.at(index)?;
        let macd = self
            .indicators
            .macd
            .as_ref()
            .and_then(|m| Some((m.line.get(index)?, m.signal.get(index)?)));

        Some(Snapshot {
            candle,
            rsi: self.indicators.rsi.get(index)?,
            mid,
            upper,
            lower,
            macd,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    candle: Candle,
    rsi: f64,
    mid: f64,
    upper: f64,
    lower: f64,
    /// `(line, signal)` when MACD is computed and defined
    macd: Option<(f64, f64)>,
}

impl Snapshot {
    /// Upper band narrowed by `buffer`
    fn upper_inner(&self, buffer: f64) -> f64 {
        self.upper - buffer
    }

    /// Lower band narrowed by `buffer`
    fn lower_inner(&self, buffer: f64) -> f64 {
        self.lower + buffer
    }

    fn contained(&self, buffer: f64) -> bool {
        self.candle.high < self.upper_inner(buffer) && self.candle.low > self.lower_inner(buffer)
    }
}

#[derive(Debug, Clone, Copy)]
struct Setup {
    direction: Direction,
    kind: SetupKind,
    levels: TradeLevels,
}

impl Setup {
    /// The fast candle already touched the target or the stop
    fn already_triggered(&self, candle: &Candle) -> bool {
        match self.direction {
            Direction::Buy => {
                candle.high >= self.levels.take_profit || candle.low <= self.levels.stop_loss
            }
            Direction::Sell => {
                candle.low <= self.levels.take_profit || candle.high >= self.levels.stop_loss
            }
            Direction::Wait => false,
        }
    }
}

/// Classify the current state of `symbol`
pub fn classify(
    symbol: &str,
    fast: &Timeframe<'_>,
    slow: &Timeframe<'_>,
    rules: &RuleConfig,
) -> Signal {
    let timestamp = fast.series.last().map(|c| c.timestamp);

    if !fast.is_usable() || !slow.is_usable() {
        return Signal::wait(symbol, timestamp, WaitReason::NoData);
    }

    let (Some(f), Some(s)) = (fast.snapshot(), slow.snapshot()) else {
        return Signal::wait(symbol, timestamp, WaitReason::InsufficientWarmup);
    };

    if !rsi_gate(&f, &s, rules) {
        return Signal::wait(symbol, timestamp, WaitReason::WeakRsi);
    }

    let Some(setup) = trend_setup(&f, &s, rules).or_else(|| reversal_setup(&f, &s, rules)) else {
        return Signal::no_setup(symbol, timestamp);
    };

    if rules.macd_confirmation && !macd_confirms(&f, setup.direction) {
        return Signal::wait(symbol, timestamp, WaitReason::MacdUnconfirmed);
    }

    let guarded = match setup.kind {
        SetupKind::Trend => rules.guard_trend,
        SetupKind::Reversal => rules.guard_reversal,
    };
    if guarded && setup.already_triggered(&f.candle) {
        return Signal::wait(symbol, timestamp, WaitReason::AlreadyTriggered);
    }

    match setup.direction {
        Direction::Buy => Signal::buy(symbol, timestamp, setup.kind, setup.levels),
        Direction::Sell => Signal::sell(symbol, timestamp, setup.kind, setup.levels),
        Direction::Wait => Signal::no_setup(symbol, timestamp),
    }
}

/// Strict on both sides: a value equal to a threshold fails
fn rsi_gate(fast: &Snapshot, slow: &Snapshot, rules: &RuleConfig) -> bool {
    let oversold = fast.rsi < rules.rsi_low && slow.rsi < rules.rsi_low;
    let overbought = fast.rsi > rules.rsi_high && slow.rsi > rules.rsi_high;
    oversold || overbought
}

fn trend_setup(fast: &Snapshot, slow: &Snapshot, rules: &RuleConfig) -> Option<Setup> {
    let buffer = rules.band_buffer;
    if !slow.contained(buffer) {
        return None;
    }

    let f = &fast.candle;
    if f.close > fast.mid && f.high < fast.upper_inner(buffer) && slow.candle.is_bullish() {
        return Some(Setup {
            direction: Direction::Buy,
            kind: SetupKind::Trend,
            levels: TradeLevels {
                entry: f.close,
                take_profit: fast.upper,
                stop_loss: slow.candle.open,
            },
        });
    }

    if f.close < fast.mid && f.low > fast.lower_inner(buffer) && slow.candle.is_bearish() {
        return Some(Setup {
            direction: Direction::Sell,
            kind: SetupKind::Trend,
            levels: TradeLevels {
                entry: f.close,
                take_profit: fast.lower,
                stop_loss: slow.candle.open,
            },
        });
    }

    None
}

fn reversal_setup(fast: &Snapshot, slow: &Snapshot, rules: &RuleConfig) -> Option<Setup> {
    let buffer = rules.band_buffer;
    let f = &fast.candle;

    if slow.candle.is_bullish()
        && f.is_bullish()
        && f.close < fast.mid
        && f.low < fast.lower_inner(buffer)
        && f.high < fast.mid
    {
        let stop_loss = match rules.reversal_stop {
            ReversalStop::FastExtreme => f.low,
            ReversalStop::SlowOpen => slow.candle.open,
        };
        return Some(Setup {
            direction: Direction::Buy,
            kind: SetupKind::Reversal,
            levels: TradeLevels {
                entry: f.close,
                take_profit: fast.mid,
                stop_loss,
            },
        });
    }

    if slow.candle.is_bearish()
        && f.is_bearish()
        && f.close > fast.mid
        && f.high > fast.upper_inner(buffer)
        && f.low > fast.mid
    {
        let stop_loss = match rules.reversal_stop {
            ReversalStop::FastExtreme => f.high,
            ReversalStop::SlowOpen => slow.candle.open,
        };
        return Some(Setup {
            direction: Direction::Sell,
            kind: SetupKind::Reversal,
            levels: TradeLevels {
                entry: f.close,
                take_profit: fast.mid,
                stop_loss,
            },
        });
    }

    None
}

/// Undefined MACD never confirms
fn macd_confirms(fast: &Snapshot, direction: Direction) -> bool {
    match (fast.macd, direction) {
        (Some((line, signal)), Direction::Buy) => line > signal,
        (Some((line, signal)), Direction::Sell) => line < signal,
        _ => false,
    }
}
