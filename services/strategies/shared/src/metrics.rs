//! Strategy metrics collection

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Thread-safe metrics collector for strategies
#[derive(Debug)]
pub struct MetricsCollector {
    start_time: Instant,
    passes_completed: AtomicU64,
    symbols_processed: AtomicU64,
    signals_generated: AtomicU64,
    notifications_sent: AtomicU64,
    errors: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            passes_completed: AtomicU64::new(0),
            symbols_processed: AtomicU64::new(0),
            signals_generated: AtomicU64::new(0),
            notifications_sent: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    pub fn increment_passes(&self) {
        self.passes_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_symbols(&self) {
        self.symbols_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_signals(&self) {
        self.signals_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_notifications(&self) {
        self.notifications_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn passes_completed(&self) -> u64 {
        self.passes_completed.load(Ordering::Relaxed)
    }

    pub fn get_metrics(&self) -> super::StrategyMetrics {
        super::StrategyMetrics {
            passes_completed: self.passes_completed.load(Ordering::Relaxed),
            symbols_processed: self.symbols_processed.load(Ordering::Relaxed),
            signals_generated: self.signals_generated.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            uptime_secs: self.uptime().as_secs(),
        }
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
