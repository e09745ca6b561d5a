use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Notifier;
use crate::config::TelegramConfig;
use crate::error::truncate_body;
use crate::{AdapterError, Result};

const PROVIDER: &str = "telegram";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct BotResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

/// Sends plain-text messages through the Telegram Bot API `sendMessage` method
pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|source| AdapterError::Http {
                provider: PROVIDER,
                source,
            })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.base_url.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn send(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|source| AdapterError::Http {
                provider: PROVIDER,
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

        let parsed: BotResponse = serde_json::from_str(&body)?;
        if !parsed.ok {
            return Err(AdapterError::Api {
                provider: PROVIDER,
                code: parsed.error_code,
                message: parsed
                    .description
                    .unwrap_or_else(|| "request rejected".to_string()),
            });
        }

        debug!("Telegram message delivered to chat {}", self.chat_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_token() {
        let config = TelegramConfig {
            enabled: true,
            base_url: "https://api.telegram.org/".to_string(),
            bot_token: "123:abc".to_string(),
            chat_id: "42".to_string(),
            ..Default::default()
        };
        let notifier = TelegramNotifier::new(&config).unwrap();
        assert_eq!(
            notifier.endpoint,
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_new_rejects_missing_chat_id() {
        let config = TelegramConfig {
            enabled: true,
            bot_token: "123:abc".to_string(),
            ..Default::default()
        };
        assert!(TelegramNotifier::new(&config).is_err());
    }

    #[test]
    fn test_payload_shape() {
        let payload = SendMessage {
            chat_id: "42",
            text: "hello",
            disable_web_page_preview: true,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["chat_id"], "42");
        assert_eq!(json["text"], "hello");
        assert_eq!(json["disable_web_page_preview"], true);
    }
}
