//! Candle sources
//!
//! A [`CandleSource`] turns a `(symbol, interval, count)` request into a validated
//! [`PriceSeries`]. `Ok(None)` means "no usable data this time" (every credential
//! failed or the provider returned too few candles) and is an expected outcome;
//! `Err` is reserved for responses whose content is malformed.

mod twelvedata;

pub use twelvedata::TwelveDataClient;

use async_trait::async_trait;
use std::sync::Arc;
use types::{Interval, PriceSeries};

use crate::Result;

#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Most recent `count` candles for `symbol`, oldest first
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<Option<PriceSeries>>;
}

#[async_trait]
impl<T: CandleSource + ?Sized> CandleSource for Arc<T> {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<Option<PriceSeries>> {
        (**self).fetch_candles(symbol, interval, count).await
    }
}
