//! Per-credential rate limiting for provider API requests

use governor::{DefaultDirectRateLimiter, Quota};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One limiter per API key, indexed in key order
///
/// A free-tier key allows a fixed number of requests per minute; checking the
/// limiter before each request lets the caller move on to the next key instead
/// of burning a request that the provider would reject.
#[derive(Clone)]
pub struct KeyRateLimiter {
    limiters: Vec<Option<Arc<DefaultDirectRateLimiter>>>,
}

impl KeyRateLimiter {
    /// `requests_per_minute == 0` disables limiting
    pub fn new(key_count: usize, requests_per_minute: u32) -> Self {
        let limiters = (0..key_count)
            .map(|_| {
                NonZeroU32::new(requests_per_minute)
                    .map(|rate| Arc::new(DefaultDirectRateLimiter::direct(Quota::per_minute(rate))))
            })
            .collect();
        Self { limiters }
    }

    /// Check if a request with key `index` is allowed (non-blocking, consumes a cell)
    pub fn check(&self, index: usize) -> bool {
        match self.limiters.get(index) {
            Some(Some(limiter)) => limiter.check().is_ok(),
            _ => true,
        }
    }

    /// Wait until a request with key `index` is allowed
    pub async fn wait(&self, index: usize) {
        if let Some(Some(limiter)) = self.limiters.get(index) {
            limiter.until_ready().await;
        }
    }

    pub fn key_count(&self) -> usize {
        self.limiters.len()
    }
}

/// Request outcome counters for one API key
#[derive(Debug, Default)]
pub struct KeyUsage {
    requests: AtomicU64,
    failures: AtomicU64,
    throttled: AtomicU64,
}

impl KeyUsage {
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_throttled(&self) {
        self.throttled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> KeyUsageSnapshot {
        KeyUsageSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            throttled: self.throttled.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`KeyUsage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyUsageSnapshot {
    pub requests: u64,
    pub failures: u64,
    pub throttled: u64,
}
