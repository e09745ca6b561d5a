//! Service configuration defaults
//!
//! Default values and constants used across Bandwatch services for consistency.

/// Market data adapter defaults
pub mod market_data {
    /// Twelve Data REST endpoint
    pub const BASE_URL: &str = "https://api.twelvedata.com";

    /// Free-tier allowance per API key
    pub const REQUESTS_PER_MINUTE: u32 = 8;

    /// HTTP request timeout (seconds)
    pub const TIMEOUT_SECS: u64 = 15;

    /// Candles requested per fetch
    pub const OUTPUT_SIZE: usize = 100;

    /// Shorter series are reported as "no data"
    pub const MIN_CANDLES: usize = 35;
}

/// Notification defaults
pub mod telegram {
    /// Telegram Bot API endpoint
    pub const BASE_URL: &str = "https://api.telegram.org";

    /// HTTP request timeout (seconds)
    pub const TIMEOUT_SECS: u64 = 10;
}

/// Strategy service defaults
pub mod strategies {
    /// Environment variable naming the config file
    pub const CONFIG_PATH_ENV: &str = "BANDWATCH_CONFIG_PATH";

    /// Config file used when neither CLI nor env names one
    pub const DEFAULT_CONFIG_PATH: &str = "configs/band_signals.toml";

    /// Pause between full passes over all symbols (seconds)
    pub const POLL_INTERVAL_SECS: u64 = 60;
}

/// Health endpoint defaults
pub mod health {
    /// HTTP port for /health, /ready, /status, /metrics
    pub const PORT: u16 = 8080;
}
