//! Error types for the adapters module

use thiserror::Error;
use types::SeriesError;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Main error type for adapter operations
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Transport failure talking to a provider (connect, timeout, body read)
    #[error("HTTP request to {provider} failed: {source}")]
    Http {
        /// Provider being called
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Provider answered with a non-success status
    #[error("{provider} returned HTTP {status}: {body}")]
    HttpStatus {
        /// Provider being called
        provider: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Provider answered 200 but reported an error in the body
    #[error("{provider} API error{}: {message}", .code.map(|c| format!(" {}", c)).unwrap_or_default())]
    Api {
        /// Provider being called
        provider: &'static str,
        /// Provider error code, when given
        code: Option<i64>,
        /// Provider error message
        message: String,
    },

    /// JSON parsing error from provider response
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Numeric field that does not parse as a finite number
    #[error("Invalid numeric value for {field}: {value}")]
    InvalidNumeric {
        /// Field name
        field: &'static str,
        /// Raw value received
        value: String,
    },

    /// Candle timestamp in an unrecognized format
    #[error("Invalid timestamp: {value}")]
    InvalidTimestamp {
        /// Raw value received
        value: String,
    },

    /// Decoded candles violate series ordering or finiteness
    #[error("Malformed series for {symbol}: {source}")]
    MalformedSeries {
        /// Instrument requested
        symbol: String,
        #[source]
        source: SeriesError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AdapterError {
    /// Failures that are specific to the credential or the exchange with the
    /// provider, so the next API key may succeed
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AdapterError::Http { .. }
                | AdapterError::HttpStatus { .. }
                | AdapterError::Api { .. }
                | AdapterError::JsonParse(_)
        )
    }

    /// The response decoded but its content cannot be trusted
    pub fn is_malformed_data(&self) -> bool {
        matches!(
            self,
            AdapterError::InvalidNumeric { .. }
                | AdapterError::InvalidTimestamp { .. }
                | AdapterError::MalformedSeries { .. }
        )
    }
}

/// Shorten a response body for inclusion in an error message
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX_BODY_CHARS: usize = 200;
    if body.chars().count() <= MAX_BODY_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_BODY_CHARS).collect();
        format!("{}...", head)
    }
}
