//! Notification de-duplication
//!
//! The classifier runs every pass; only changes are announced. The caller owns
//! the [`LastSignalState`] and hands it in by `&mut`, so nothing here is global.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use types::{Direction, Signal};

use crate::config::NotifyPolicy;

/// Direction and candle time of the last announced signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmittedSignal {
    pub direction: Direction,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Last announced signal per symbol; empty at start, never pruned
#[derive(Debug, Clone, Default)]
pub struct LastSignalState {
    entries: HashMap<String, EmittedSignal>,
}

impl LastSignalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<&EmittedSignal> {
        self.entries.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmittedSignal)> {
        self.entries.iter().map(|(symbol, emitted)| (symbol.as_str(), emitted))
    }

    fn record(&mut self, symbol: &str, signal: &Signal) {
        self.entries.insert(
            symbol.to_string(),
            EmittedSignal {
                direction: signal.direction,
                timestamp: signal.timestamp,
            },
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChangeDetector {
    policy: NotifyPolicy,
}

impl ChangeDetector {
    pub fn new(policy: NotifyPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> NotifyPolicy {
        self.policy
    }

    /// Decide whether `signal` is news for `symbol`, recording it when it is
    ///
    /// A symbol without an entry counts as having last announced `wait`.
    pub fn should_notify(
        &self,
        symbol: &str,
        signal: &Signal,
        state: &mut LastSignalState,
    ) -> bool {
        let last = state.get(symbol).copied();
        let last_direction = last.map_or(Direction::Wait, |l| l.direction);
        let direction_changed = signal.direction != last_direction;

        let fire = match self.policy {
            NotifyPolicy::DirectionChange => direction_changed,
            NotifyPolicy::DirectionOrTimestamp => {
                direction_changed
                    || (signal.direction.is_actionable()
                        && last.map_or(true, |l| l.timestamp != signal.timestamp))
            }
        };

        if fire {
            state.record(symbol, signal);
        }
        fire
    }
}
