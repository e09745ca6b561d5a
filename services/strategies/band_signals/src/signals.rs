//! Signal generation statistics

use chrono::{DateTime, Utc};
use serde::Serialize;
use types::{Direction, SetupKind, Signal};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SignalStats {
    pub total_signals: u64,
    pub buy_signals: u64,
    pub sell_signals: u64,
    pub wait_signals: u64,
    pub trend_setups: u64,
    pub reversal_setups: u64,
    pub notifications_sent: u64,
    /// Candle time of the most recent signal that had one
    pub last_signal_time: Option<DateTime<Utc>>,
}

impl SignalStats {
    pub fn record_signal(&mut self, signal: &Signal) {
        self.total_signals += 1;

        match signal.direction {
            Direction::Buy => self.buy_signals += 1,
            Direction::Sell => self.sell_signals += 1,
            Direction::Wait => self.wait_signals += 1,
        }

        match signal.strategy {
            Some(SetupKind::Trend) => self.trend_setups += 1,
            Some(SetupKind::Reversal) => self.reversal_setups += 1,
            None => {}
        }

        if signal.timestamp.is_some() {
            self.last_signal_time = signal.timestamp;
        }
    }

    pub fn record_notification(&mut self) {
        self.notifications_sent += 1;
    }
}
