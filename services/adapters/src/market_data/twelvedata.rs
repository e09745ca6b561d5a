//! Twelve Data REST client
//!
//! `GET {base_url}/time_series` with an ordered list of API keys. A key that
//! fails (transport error, non-2xx status, `"status": "error"` body or an
//! undecodable body) is logged by position and the next key is tried. Keys
//! that are locally throttled are skipped; when every key is throttled the
//! client waits for the first one.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};
use types::{Candle, Interval, PriceSeries};

use super::CandleSource;
use crate::config::MarketDataConfig;
use crate::error::truncate_body;
use crate::rate_limit::{KeyRateLimiter, KeyUsage, KeyUsageSnapshot};
use crate::{AdapterError, Result};

const PROVIDER: &str = "twelvedata";

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    values: Vec<RawCandle>,
}

#[derive(Debug, Deserialize)]
struct RawCandle {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
}

impl RawCandle {
    fn into_candle(self) -> Result<Candle> {
        Ok(Candle::new(
            parse_datetime(&self.datetime)?,
            parse_price("open", &self.open)?,
            parse_price("high", &self.high)?,
            parse_price("low", &self.low)?,
            parse_price("close", &self.close)?,
        ))
    }
}

fn parse_price(field: &'static str, raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AdapterError::InvalidNumeric {
            field,
            value: raw.to_string(),
        }),
    }
}

/// Intraday candles carry a time, daily candles only a date; both are UTC
/// because every request asks for `timezone=UTC`
fn parse_datetime(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| AdapterError::InvalidTimestamp {
            value: raw.to_string(),
        })
}

/// Outcome of one request with one key
enum Attempt {
    Candles(Vec<Candle>),
    Throttled,
}

pub struct TwelveDataClient {
    client: reqwest::Client,
    base_url: String,
    api_keys: Vec<String>,
    output_size: usize,
    min_candles: usize,
    limiter: KeyRateLimiter,
    usage: Vec<KeyUsage>,
}

impl TwelveDataClient {
    pub fn new(config: &MarketDataConfig) -> Result<Self> {
        let api_keys: Vec<String> = config
            .api_keys
            .iter()
            .filter(|key| !key.trim().is_empty())
            .cloned()
            .collect();
        if api_keys.is_empty() {
            return Err(AdapterError::Configuration(
                "Twelve Data client needs at least one API key".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .pool_idle_timeout(std::time::Duration::from_secs(300))
            .pool_max_idle_per_host(2)
            .timeout(config.timeout())
            .tcp_nodelay(true)
            .build()
            .map_err(|source| AdapterError::Http {
                provider: PROVIDER,
                source,
            })?;

        info!(
            "Twelve Data client ready: {} key(s), {} req/min per key",
            api_keys.len(),
            config.requests_per_minute
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limiter: KeyRateLimiter::new(api_keys.len(), config.requests_per_minute),
            usage: api_keys.iter().map(|_| KeyUsage::default()).collect(),
            api_keys,
            output_size: config.output_size,
            min_candles: config.min_candles,
        })
    }

    /// Candles requested when the caller passes `count == 0`
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Request counters per key, in key order
    pub fn key_usage(&self) -> Vec<KeyUsageSnapshot> {
        self.usage.iter().map(KeyUsage::snapshot).collect()
    }

    async fn attempt(
        &self,
        index: usize,
        symbol: &str,
        interval: Interval,
        count: usize,
        wait_for_capacity: bool,
    ) -> Result<Attempt> {
        if wait_for_capacity {
            self.limiter.wait(index).await;
        } else if !self.limiter.check(index) {
            self.usage[index].record_throttled();
            return Ok(Attempt::Throttled);
        }

        self.usage[index].record_request();
        match self.request(&self.api_keys[index], symbol, interval, count).await {
            Ok(candles) => Ok(Attempt::Candles(candles)),
            Err(e) => {
                if e.is_credential_failure() {
                    self.usage[index].record_failure();
                }
                Err(e)
            }
        }
    }

    async fn request(
        &self,
        api_key: &str,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<Vec<Candle>> {
        let url = format!("{}/time_series", self.base_url);
        let outputsize = count.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval.as_str()),
                ("outputsize", outputsize.as_str()),
                ("timezone", "UTC"),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|source| AdapterError::Http {
                provider: PROVIDER,
                // The query string carries the API key
                source: source.without_url(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| AdapterError::Http {
            provider: PROVIDER,
            source: source.without_url(),
        })?;

        if !status.is_success() {
            return Err(AdapterError::HttpStatus {
                provider: PROVIDER,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: TimeSeriesResponse = serde_json::from_str(&body)?;
        if parsed.status.as_deref() == Some("error") {
            return Err(AdapterError::Api {
                provider: PROVIDER,
                code: parsed.code,
                message: parsed
                    .message
                    .unwrap_or_else(|| "unspecified error".to_string()),
            });
        }

        let mut candles = parsed
            .values
            .into_iter()
            .map(RawCandle::into_candle)
            .collect::<Result<Vec<_>>>()?;

        // Provider returns newest first
        candles.reverse();
        Ok(candles)
    }
}

#[async_trait]
impl CandleSource for TwelveDataClient {
    async fn fetch_candles(
        &self,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<Option<PriceSeries>> {
        let count = if count == 0 { self.output_size } else { count };
        let mut throttled = 0;
        let mut candles = None;

        for index in 0..self.api_keys.len() {
            match self.attempt(index, symbol, interval, count, false).await {
                Ok(Attempt::Candles(found)) => {
                    candles = Some(found);
                    break;
                }
                Ok(Attempt::Throttled) => {
                    debug!("API key #{} throttled, trying next", index + 1);
                    throttled += 1;
                }
                Err(e) if e.is_credential_failure() => {
                    warn!(
                        "API key #{} failed for {} {}: {}",
                        index + 1,
                        symbol,
                        interval,
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }

        if candles.is_none() && throttled == self.api_keys.len() {
            debug!("All API keys throttled, waiting for key #1");
            match self.attempt(0, symbol, interval, count, true).await {
                Ok(Attempt::Candles(found)) => candles = Some(found),
                Ok(Attempt::Throttled) => {}
                Err(e) if e.is_credential_failure() => {
                    warn!("API key #1 failed for {} {}: {}", symbol, interval, e);
                }
                Err(e) => return Err(e),
            }
        }

        let Some(candles) = candles else {
            warn!("All API keys exhausted for {} {}", symbol, interval);
            return Ok(None);
        };

        if candles.len() < self.min_candles {
            warn!(
                "Only {} candles for {} {} (need {}), treating as no data",
                candles.len(),
                symbol,
                interval,
                self.min_candles
            );
            return Ok(None);
        }

        let series = PriceSeries::new(symbol, interval, candles).map_err(|source| {
            AdapterError::MalformedSeries {
                symbol: symbol.to_string(),
                source,
            }
        })?;
        debug!(
            "Fetched {} candles for {} {}",
            series.len(),
            symbol,
            interval
        );
        Ok(Some(series))
    }
}
