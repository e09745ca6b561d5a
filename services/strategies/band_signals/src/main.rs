//! Band Signals Service Main Entry Point

use adapter_service::{LogNotifier, Notifier, TelegramNotifier, TwelveDataClient};
use anyhow::{Context, Result};
use band_signals::{BandSignalStrategy, ServiceConfig};
use clap::Parser;
use health_check::{HealthCheckServer, ServiceHealth};
use service_config::defaults::strategies::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use service_config::resolve_config_path;
use std::path::PathBuf;
use std::time::Duration;
use strategy_shared::{init_strategy_logging, Strategy};
use tokio::signal;
use tracing::{error, info};

const SERVICE_NAME: &str = "band_signals";

#[derive(Debug, Parser)]
#[command(name = "band_signals", about = "Multi-timeframe RSI / Bollinger signal service")]
struct Cli {
    /// Config file (default: $BANDWATCH_CONFIG_PATH or configs/band_signals.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single pass over all symbols and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| resolve_config_path(CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH));
    let config = ServiceConfig::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;

    init_strategy_logging(SERVICE_NAME, &config.logging)?;

    info!("Starting Bandwatch band signals service");

    config.validate().context("Invalid configuration")?;

    info!(
        "Configuration loaded: {} symbol(s), {} API key(s), telegram {}",
        config.strategy.symbols.len(),
        config.market_data.api_keys.len(),
        if config.telegram.enabled { "enabled" } else { "disabled" }
    );

    let source = TwelveDataClient::new(&config.market_data)
        .context("Failed to create market data client")?;

    let notifier: Box<dyn Notifier> = if config.telegram.enabled {
        Box::new(
            TelegramNotifier::new(&config.telegram)
                .context("Failed to create Telegram notifier")?,
        )
    } else {
        info!("Telegram disabled, notifications go to the log");
        Box::new(LogNotifier)
    };

    let output_size = source.output_size();
    let mut strategy =
        BandSignalStrategy::new(config.strategy.clone(), output_size, source, notifier);
    info!("Strategy {} ready", strategy.name());

    if config.health.enabled {
        let mut health = ServiceHealth::new(SERVICE_NAME);
        health.set_stale_after(stale_after(&config));

        let server = HealthCheckServer::new(health, config.health.port);
        strategy = strategy.with_health(server.shared());

        tokio::spawn(async move {
            if let Err(e) = server.start().await {
                error!("Health endpoint stopped: {:?}", e);
            }
        });
    }

    if cli.once {
        return strategy.run_once().await;
    }

    let strategy_handle = tokio::spawn(async move {
        if let Err(e) = strategy.start().await {
            error!("Strategy failed: {:?}", e);
        }
    });

    info!("Band signals service running. Press Ctrl+C to stop.");

    signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutting down band signals service");
    strategy_handle.abort();

    Ok(())
}

/// Longest quiet period before the health endpoint reports the loop as stuck
///
/// Two poll intervals plus a worst-case pass: every symbol fetching two series,
/// every fetch timing out on every key.
fn stale_after(config: &ServiceConfig) -> Duration {
    let fetches = config.strategy.symbols.len() as u64 * 2;
    let keys = config.market_data.api_keys.len().max(1) as u64;
    let worst_pass = config.market_data.timeout_secs * keys * fetches;
    config.strategy.poll_interval() * 2 + Duration::from_secs(worst_pass)
}
