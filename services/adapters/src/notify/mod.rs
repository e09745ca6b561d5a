//! Outbound notifications
//!
//! Delivery is fire-and-forget from the caller's point of view: [`Notifier::notify`]
//! logs a failed [`Notifier::send`] and returns, so a broken chat integration
//! never stops signal processing.

mod log;
mod telegram;

pub use self::log::LogNotifier;
pub use self::telegram::TelegramNotifier;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::Result;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Deliver one message
    async fn send(&self, text: &str) -> Result<()>;

    /// Deliver one message, logging and dropping any failure
    async fn notify(&self, text: &str) -> bool {
        match self.send(text).await {
            Ok(()) => true,
            Err(e) => {
                warn!(notifier = self.name(), "Notification dropped: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn send(&self, text: &str) -> Result<()> {
        (**self).send(text).await
    }
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn send(&self, text: &str) -> Result<()> {
        (**self).send(text).await
    }
}
