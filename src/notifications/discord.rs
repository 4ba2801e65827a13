use super::message::Alert;
use super::NotificationChannel;
use crate::config::NotificationConfig;
use crate::errors::NotificationError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::borrow::Cow;

pub const AVATAR_URL: &str = "https://cryptologos.cc/logos/usd-coin-usdc-logo.png";

/// Webhook `content` limit in characters
pub const MESSAGE_LIMIT: usize = 2000;

/// Discord webhook channel, success is HTTP 204
pub struct DiscordChannel {
    client: Client,
    webhook_url: String,
    enabled: bool,
}

/// Webhook username, e.g. `USG Wallet Monitor`
pub fn display_name(entity: &str) -> String {
    format!("{} Wallet Monitor", entity)
}

impl DiscordChannel {
    pub fn new(client: Client, config: &NotificationConfig) -> Self {
        Self {
            client,
            webhook_url: config.discord_webhook.trim().to_string(),
            enabled: config.discord_enabled,
        }
    }
}

#[async_trait]
impl NotificationChannel for DiscordChannel {
    fn name(&self) -> &'static str {
        "discord"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, alert: &Alert) -> Result<(), NotificationError> {
        if self.webhook_url.is_empty() {
            return Err(NotificationError::Incomplete {
                channel: self.name(),
                reason: "webhook URL not configured".to_string(),
            });
        }

        let content = alert.body_within(MESSAGE_LIMIT);
        if let Cow::Owned(_) = content {
            logger::warning(
                LogTag::Discord,
                &format!(
                    "Alert for {} wallets exceeds {} characters, sending a trimmed message",
                    alert.wallet_count, MESSAGE_LIMIT
                ),
            );
        }

        let payload = json!({
            "content": content,
            "username": display_name(&alert.entity),
            "avatar_url": AVATAR_URL,
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(NotificationError::UnexpectedStatus {
                channel: self.name(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}
