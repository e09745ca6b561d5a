//! Strategy traits and interfaces

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Core strategy trait that all signal strategies implement
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Strategy name for identification
    fn name(&self) -> &'static str;

    /// Run until the task is cancelled
    async fn start(&mut self) -> Result<()>;

    /// Run exactly one pass, then return
    async fn run_once(&mut self) -> Result<()>;

    /// Get current strategy metrics
    fn metrics(&self) -> StrategyMetrics;
}

/// Basic strategy metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StrategyMetrics {
    /// Completed passes over the symbol list
    pub passes_completed: u64,
    pub symbols_processed: u64,
    pub signals_generated: u64,
    pub notifications_sent: u64,
    pub errors: u64,
    pub uptime_secs: u64,
}
