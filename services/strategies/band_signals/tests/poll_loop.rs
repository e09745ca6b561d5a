//! Poll loop behaviour against scripted market data and a recording notifier

use adapter_service::{AdapterError, CandleSource, Notifier};
use async_trait::async_trait;
use band_signals::{BandSignalStrategy, PassSummary, StrategyConfig};
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use types::{Candle, Direction, Interval, PriceSeries};

#[derive(Clone)]
enum Script {
    Series(PriceSeries),
    Missing,
    Malformed,
    Fail,
}

#[derive(Default)]
struct ScriptedSource {
    scripts: Mutex<HashMap<(String, Interval), Script>>,
}

impl ScriptedSource {
    fn set(&self, symbol: &str, interval: Interval, script: Script) {
        self.scripts
            .lock()
            .insert((symbol.to_string(), interval), script);
    }

    /// Same shape on both timeframes
    fn set_trend(&self, symbol: &str, step: f64) {
        self.set(
            symbol,
            Interval::FiveMinutes,
            Script::Series(trending(symbol, Interval::FiveMinutes, step * 0.2)),
        );
        self.set(
            symbol,
            Interval::OneHour,
            Script::Series(trending(symbol, Interval::OneHour, step)),
        );
    }
}

#[async_trait]
impl CandleSource for ScriptedSource {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        _count: usize,
    ) -> adapter_service::Result<Option<PriceSeries>> {
        let script = self
            .scripts
            .lock()
            .get(&(symbol.to_string(), interval))
            .cloned()
            .unwrap_or(Script::Missing);
        match script {
            Script::Series(series) => Ok(Some(series)),
            Script::Missing => Ok(None),
            Script::Malformed => Err(AdapterError::InvalidTimestamp {
                value: "not-a-date".to_string(),
            }),
            Script::Fail => Err(AdapterError::Configuration("client misconfigured".to_string())),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, text: &str) -> adapter_service::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AdapterError::Configuration("chat unreachable".to_string()));
        }
        self.messages.lock().push(text.to_string());
        Ok(())
    }
}

/// 60 straight-line candles ending at 100
fn trending(symbol: &str, interval: Interval, step: f64) -> PriceSeries {
    let t0 = Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap();
    let len = 60;
    let candles = (0..len)
        .map(|i| {
            let close = 100.0 - (len - 1 - i) as f64 * step;
            let open = close - step;
            let wick = step.abs().max(0.2) / 2.0;
            Candle::new(
                t0 + interval.duration() * i,
                open,
                open.max(close) + wick,
                open.min(close) - wick,
                close,
            )
        })
        .collect();
    PriceSeries::new(symbol, interval, candles).unwrap()
}

fn setup(
    symbols: &[&str],
) -> (
    Arc<ScriptedSource>,
    Arc<RecordingNotifier>,
    BandSignalStrategy<Arc<ScriptedSource>, Arc<RecordingNotifier>>,
) {
    let source = Arc::new(ScriptedSource::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let config = StrategyConfig {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        ..StrategyConfig::default()
    };
    let strategy =
        BandSignalStrategy::new(config, 100, Arc::clone(&source), Arc::clone(&notifier));
    (source, notifier, strategy)
}

#[tokio::test]
async fn notifies_once_per_direction_change() {
    let (source, notifier, mut strategy) = setup(&["EUR/USD"]);

    source.set_trend("EUR/USD", -1.0);
    let first = strategy.run_pass().await;
    assert_eq!(first.notifications, 1);
    let messages = notifier.messages();
    assert!(messages[0].starts_with("SELL EUR/USD (trend)"), "{}", messages[0]);

    // Same data, same call: silent
    let second = strategy.run_pass().await;
    assert_eq!(second.notifications, 0);
    assert_eq!(notifier.messages().len(), 1);

    source.set_trend("EUR/USD", 1.0);
    strategy.run_pass().await;
    let messages = notifier.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[1].starts_with("BUY EUR/USD (trend)"), "{}", messages[1]);

    // Losing the data flips the call back to wait
    source.set("EUR/USD", Interval::OneHour, Script::Missing);
    strategy.run_pass().await;
    let messages = notifier.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[2].starts_with("WAIT EUR/USD\nReason: no data"), "{}", messages[2]);

    let stats = strategy.stats().read().clone();
    assert_eq!(stats.total_signals, 4);
    assert_eq!(stats.sell_signals, 2);
    assert_eq!(stats.buy_signals, 1);
    assert_eq!(stats.wait_signals, 1);
    assert_eq!(stats.notifications_sent, 3);
}

#[tokio::test]
async fn failing_symbol_does_not_stop_the_pass() {
    let (source, notifier, mut strategy) = setup(&["BAD/USD", "EUR/USD"]);

    source.set("BAD/USD", Interval::FiveMinutes, Script::Fail);
    source.set_trend("EUR/USD", -1.0);

    let summary = strategy.run_pass().await;

    assert_eq!(
        summary,
        PassSummary {
            symbols: 2,
            notifications: 1,
            errors: 1
        }
    );
    assert_eq!(notifier.messages().len(), 1);
    assert!(strategy.last_signals().get("BAD/USD").is_none());
    assert_eq!(
        strategy.last_signals().get("EUR/USD").map(|e| e.direction),
        Some(Direction::Sell)
    );
}

#[tokio::test]
async fn malformed_feed_announces_no_data_wait() {
    let (source, notifier, mut strategy) = setup(&["EUR/USD"]);

    source.set_trend("EUR/USD", 1.0);
    strategy.run_pass().await;
    assert_eq!(notifier.messages().len(), 1);

    source.set("EUR/USD", Interval::OneHour, Script::Malformed);
    let summary = strategy.run_pass().await;

    assert_eq!(
        summary,
        PassSummary {
            symbols: 1,
            notifications: 1,
            errors: 0
        }
    );
    let messages = notifier.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[1].starts_with("WAIT EUR/USD\nReason: no data"), "{}", messages[1]);
    assert_eq!(
        strategy.last_signals().get("EUR/USD").map(|e| e.direction),
        Some(Direction::Wait)
    );
}

#[tokio::test]
async fn missing_data_waits_silently() {
    let (_source, notifier, mut strategy) = setup(&["EUR/USD", "XAU/USD"]);

    let summary = strategy.run_pass().await;

    assert_eq!(summary.errors, 0);
    assert_eq!(summary.notifications, 0);
    assert!(notifier.messages().is_empty());
    assert_eq!(strategy.stats().read().wait_signals, 2);
}

#[tokio::test]
async fn failed_delivery_is_not_retried() {
    let (source, notifier, mut strategy) = setup(&["EUR/USD"]);
    notifier.failing.store(true, Ordering::SeqCst);
    source.set_trend("EUR/USD", -1.0);

    let first = strategy.run_pass().await;
    assert_eq!(first.notifications, 0);
    assert_eq!(first.errors, 0);

    notifier.failing.store(false, Ordering::SeqCst);
    strategy.run_pass().await;

    assert!(notifier.messages().is_empty());
    assert_eq!(
        strategy.last_signals().get("EUR/USD").map(|e| e.direction),
        Some(Direction::Sell)
    );
}
