//! # Bandwatch Service Configuration
//!
//! Centralized configuration loading and default values for Bandwatch services.
//!
//! ## Features
//!
//! - **Layered Loading**: compiled-in defaults, then a TOML file, then environment
//!   overrides (`BANDWATCH__SECTION__KEY`)
//! - **Secret Expansion**: `${VAR}` references in credentials resolved at startup
//! - **Shared Sections**: logging and health endpoint settings reused by every binary
//! - **Service Defaults**: provider URLs, rate limits and poll cadence in one place
//!
//! ## Usage
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use service_config::{load_config_file, resolve_config_path, ENV_PREFIX};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct MyConfig {
//!     symbols: Vec<String>,
//! }
//!
//! let path = resolve_config_path("MY_CONFIG_PATH", "configs/my_service.toml");
//! let config: MyConfig = load_config_file(&path, ENV_PREFIX, MyConfig::default()).unwrap();
//! ```

pub mod defaults;
pub mod service_config;

// Re-export commonly used types
pub use service_config::{
    expand_env, expand_env_list, load_config_file, resolve_config_path, HealthConfig, LogFormat,
    LoggingConfig, ENV_PREFIX,
};
