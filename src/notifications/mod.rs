//! New-wallet notifications
//!
//! A [`Notifier`] holds a fixed set of [`NotificationChannel`]s built once at
//! startup. `notify` renders one [`Alert`] and offers it to every enabled
//! channel; a channel failure is logged and never stops the others.

mod discord;
mod email;
mod message;
mod telegram;

pub use discord::DiscordChannel;
pub use email::EmailChannel;
pub use message::{to_html, Alert};
pub use telegram::TelegramChannel;

use crate::config::Config;
use crate::database::Wallet;
use crate::errors::{MonitorResult, NotificationError};
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A delivery mechanism for alerts
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Enabled by configuration; disabled channels are never offered an alert
    fn is_enabled(&self) -> bool;

    async fn send(&self, alert: &Alert) -> Result<(), NotificationError>;
}

pub struct Notifier {
    entity_id: String,
    base_url: String,
    channels: Vec<Box<dyn NotificationChannel>>,
}

impl Notifier {
    /// Discord, email and Telegram channels
    ///
    /// Discord uses a shared HTTP client; the Telegram bot brings its own.
    pub fn from_config(config: &Config) -> MonitorResult<Self> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let notification = &config.notification;

        let channels: Vec<Box<dyn NotificationChannel>> = vec![
            Box::new(DiscordChannel::new(client, notification)),
            Box::new(EmailChannel::new(notification)),
            Box::new(TelegramChannel::new(notification)),
        ];

        Ok(Self::with_channels(
            &config.monitoring.entity_id,
            &config.api.base_url,
            channels,
        ))
    }

    pub fn with_channels(
        entity_id: &str,
        base_url: &str,
        channels: Vec<Box<dyn NotificationChannel>>,
    ) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            base_url: base_url.to_string(),
            channels,
        }
    }

    /// Names of channels that will be offered alerts
    pub fn enabled_channels(&self) -> Vec<&'static str> {
        self.channels
            .iter()
            .filter(|c| c.is_enabled())
            .map(|c| c.name())
            .collect()
    }

    /// Send one alert for `wallets`; `true` if at least one channel delivered it
    pub async fn notify(&self, wallets: &[Wallet]) -> bool {
        if wallets.is_empty() {
            logger::info(LogTag::Notify, "No new wallets to notify about");
            return false;
        }

        let alert = Alert::now(&self.entity_id, &self.base_url, wallets);
        let mut delivered = false;
        let mut attempted = 0;

        for channel in self.channels.iter().filter(|c| c.is_enabled()) {
            attempted += 1;
            match channel.send(&alert).await {
                Ok(()) => {
                    logger::info(
                        channel_tag(channel.name()),
                        &format!("{} notification sent successfully", channel.name()),
                    );
                    delivered = true;
                }
                Err(e) => {
                    logger::warning(
                        channel_tag(channel.name()),
                        &format!("Failed to send {} notification: {}", channel.name(), e),
                    );
                }
            }
        }

        if attempted == 0 {
            logger::warning(LogTag::Notify, "No notification channels enabled");
        }

        delivered
    }
}

fn channel_tag(name: &str) -> LogTag {
    match name {
        "discord" => LogTag::Discord,
        "telegram" => LogTag::Telegram,
        "email" => LogTag::Email,
        _ => LogTag::Notify,
    }
}
