use async_trait::async_trait;
use tracing::info;

use super::Notifier;
use crate::Result;

/// Writes notifications to the log; used when no chat integration is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, text: &str) -> Result<()> {
        info!(target: "notifications", "{}", text);
        Ok(())
    }
}
