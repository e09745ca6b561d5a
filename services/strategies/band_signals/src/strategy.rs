//! Poll loop
//!
//! One pass walks the configured symbols in order: fetch the fast then the slow
//! series, compute indicators, classify, and notify when the change detector
//! says the signal is new. A failing symbol is logged and skipped; the pass
//! carries on with the next one.

use adapter_service::{CandleSource, Notifier};
use async_trait::async_trait;
use health_check::{LatencyTracker, PerformanceMetrics, SharedHealth};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use strategy_shared::{MetricsCollector, Strategy, StrategyMetrics};
use tracing::{debug, info, warn};
use types::{Interval, PriceSeries, Signal, WaitReason};

use crate::change_detector::{ChangeDetector, LastSignalState};
use crate::classifier::{classify, Timeframe};
use crate::config::StrategyConfig;
use crate::error::Result;
use crate::indicators::IndicatorSet;
use crate::notification::format_message;
use crate::signals::SignalStats;

/// Pass durations kept for the latency figures
const LATENCY_SAMPLES: usize = 256;

/// Outcome of one pass over every symbol
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub symbols: usize,
    pub notifications: usize,
    pub errors: usize,
}

pub struct BandSignalStrategy<S, N> {
    config: StrategyConfig,

    /// Candles requested per fetch
    output_size: usize,

    source: S,
    notifier: N,
    detector: ChangeDetector,

    /// Last announced signal per symbol, owned by the loop
    last_signals: LastSignalState,

    stats: Arc<RwLock<SignalStats>>,
    metrics: MetricsCollector,
    latency: LatencyTracker,

    health: Option<SharedHealth>,
}

impl<S, N> BandSignalStrategy<S, N>
where
    S: CandleSource,
    N: Notifier,
{
    pub fn new(config: StrategyConfig, output_size: usize, source: S, notifier: N) -> Self {
        let detector = ChangeDetector::new(config.notify_policy);
        Self {
            config,
            output_size,
            source,
            notifier,
            detector,
            last_signals: LastSignalState::new(),
            stats: Arc::new(RwLock::new(SignalStats::default())),
            metrics: MetricsCollector::new(),
            latency: LatencyTracker::new(LATENCY_SAMPLES),
            health: None,
        }
    }

    /// Push a snapshot to `health` after every pass
    pub fn with_health(mut self, health: SharedHealth) -> Self {
        self.health = Some(health);
        self
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn stats(&self) -> Arc<RwLock<SignalStats>> {
        Arc::clone(&self.stats)
    }

    pub fn last_signals(&self) -> &LastSignalState {
        &self.last_signals
    }

    /// Classify whatever was fetched; a missing series is a "no data" wait
    pub fn evaluate(
        &self,
        symbol: &str,
        fast: Option<&PriceSeries>,
        slow: Option<&PriceSeries>,
    ) -> Signal {
        let (Some(fast), Some(slow)) = (fast, slow) else {
            let timestamp = fast.and_then(|s| s.last()).map(|c| c.timestamp);
            return Signal::wait(symbol, timestamp, WaitReason::NoData);
        };

        let indicators = &self.config.indicators;
        let fast_set = IndicatorSet::compute(fast, indicators);
        let slow_set = IndicatorSet::compute(slow, indicators);

        classify(
            symbol,
            &Timeframe::new(fast, &fast_set),
            &Timeframe::new(slow, &slow_set),
            &self.config.rules_for(symbol),
        )
    }

    /// Malformed provider data counts as no data for this pass
    async fn fetch(&self, symbol: &str, interval: Interval) -> Result<Option<PriceSeries>> {
        match self
            .source
            .fetch_candles(symbol, interval, self.output_size)
            .await
        {
            Ok(series) => Ok(series),
            Err(e) if e.is_malformed_data() => {
                warn!("Discarding malformed {} {} data: {}", symbol, interval, e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch, classify and maybe notify for one symbol
    ///
    /// Returns whether a notification was delivered.
    pub async fn process_symbol(&mut self, symbol: &str) -> Result<bool> {
        let fast = self.fetch(symbol, self.config.fast_interval).await?;
        let slow = self.fetch(symbol, self.config.slow_interval).await?;

        let signal = self.evaluate(symbol, fast.as_ref(), slow.as_ref());
        self.metrics.increment_signals();
        self.stats.write().record_signal(&signal);

        debug!(
            symbol,
            direction = %signal.direction,
            reason = ?signal.reason,
            strategy = ?signal.strategy,
            "Classified"
        );

        if !self
            .detector
            .should_notify(symbol, &signal, &mut self.last_signals)
        {
            return Ok(false);
        }

        info!(
            symbol,
            direction = %signal.direction,
            strategy = ?signal.strategy,
            "Signal changed"
        );

        let delivered = self.notifier.notify(&format_message(&signal)).await;
        if delivered {
            self.metrics.increment_notifications();
            self.stats.write().record_notification();
        }
        Ok(delivered)
    }

    /// One pass over every configured symbol
    pub async fn run_pass(&mut self) -> PassSummary {
        let started = Instant::now();
        let symbols = self.config.symbols.clone();
        let mut summary = PassSummary::default();
        let mut failures = Vec::new();

        for symbol in &symbols {
            summary.symbols += 1;
            self.metrics.increment_symbols();

            match self.process_symbol(symbol).await {
                Ok(true) => summary.notifications += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!("Failed to process {}: {}", symbol, e);
                    summary.errors += 1;
                    self.metrics.increment_errors();
                    failures.push(format!("{}: {}", symbol, e));
                }
            }
        }

        self.metrics.increment_passes();
        self.latency.record(started.elapsed());

        debug!(
            symbols = summary.symbols,
            notifications = summary.notifications,
            errors = summary.errors,
            elapsed_ms = self.latency.last_ms(),
            "Pass complete"
        );

        self.publish_health(summary.errors as u64, failures).await;
        summary
    }

    async fn publish_health(&self, last_pass_errors: u64, failures: Vec<String>) {
        let Some(health) = &self.health else {
            return;
        };

        let metrics = self.metrics.get_metrics();
        let snapshot = PerformanceMetrics {
            passes_completed: metrics.passes_completed,
            symbols_processed: metrics.symbols_processed,
            signals_generated: metrics.signals_generated,
            notifications_sent: metrics.notifications_sent,
            errors: metrics.errors,
            last_pass_errors,
            last_pass_ms: self.latency.last_ms(),
            avg_pass_ms: self.latency.average_ms(),
            p99_pass_ms: self.latency.p99_ms(),
        };
        let directions: Vec<(String, String)> = self
            .last_signals
            .iter()
            .map(|(symbol, emitted)| (symbol.to_string(), emitted.direction.to_string()))
            .collect();

        let mut health = health.lock().await;
        for (symbol, direction) in &directions {
            health.add_detail(symbol, direction);
        }
        for failure in &failures {
            health.add_error(failure);
        }
        health.update_metrics(snapshot);
    }
}

#[async_trait]
impl<S, N> Strategy for BandSignalStrategy<S, N>
where
    S: CandleSource,
    N: Notifier,
{
    fn name(&self) -> &'static str {
        "band_signals"
    }

    async fn start(&mut self) -> anyhow::Result<()> {
        info!(
            "Polling {} symbol(s) every {:?} ({} / {})",
            self.config.symbols.len(),
            self.config.poll_interval(),
            self.config.fast_interval,
            self.config.slow_interval
        );

        loop {
            let summary = self.run_pass().await;
            if summary.errors > 0 {
                warn!(
                    "Pass finished with {} failed symbol(s) out of {}",
                    summary.errors, summary.symbols
                );
            }
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    async fn run_once(&mut self) -> anyhow::Result<()> {
        let summary = self.run_pass().await;
        info!(
            "Single pass complete: {} symbol(s), {} notification(s), {} error(s)",
            summary.symbols, summary.notifications, summary.errors
        );
        Ok(())
    }

    fn metrics(&self) -> StrategyMetrics {
        self.metrics.get_metrics()
    }
}
