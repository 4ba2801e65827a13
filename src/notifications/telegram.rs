//! Telegram Bot API channel
//!
//! Sends the alert through `sendMessage` with the legacy Markdown parse mode.
//! A message is delivered when the Bot API answers `ok`.

use super::message::Alert;
use super::NotificationChannel;
use crate::config::NotificationConfig;
use crate::errors::NotificationError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use std::borrow::Cow;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode, Recipient};

/// `sendMessage` text limit in characters
pub const MESSAGE_LIMIT: usize = 4096;

pub struct TelegramChannel {
    api_url: String,
    bot_token: String,
    chat_id: String,
    enabled: bool,
}

impl TelegramChannel {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            api_url: config.telegram_api_url.trim().to_string(),
            bot_token: config.telegram_bot_token.trim().to_string(),
            chat_id: config.telegram_chat_id.trim().to_string(),
            enabled: config.telegram_enabled,
        }
    }

    fn bot(&self) -> Result<Bot, NotificationError> {
        let api_url = reqwest::Url::parse(&self.api_url).map_err(|e| NotificationError::Incomplete {
            channel: self.name(),
            reason: format!("invalid API URL '{}': {}", self.api_url, e),
        })?;
        Ok(Bot::new(&self.bot_token).set_api_url(api_url))
    }
}

/// Numeric chat ids or `@channel` usernames
fn recipient(chat_id: &str) -> Option<Recipient> {
    if chat_id.starts_with('@') && chat_id.len() > 1 {
        return Some(Recipient::ChannelUsername(chat_id.to_string()));
    }
    chat_id.parse::<i64>().ok().map(|id| Recipient::Id(ChatId(id)))
}

#[async_trait]
impl NotificationChannel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, alert: &Alert) -> Result<(), NotificationError> {
        if self.bot_token.is_empty() || self.chat_id.is_empty() {
            return Err(NotificationError::Incomplete {
                channel: self.name(),
                reason: "bot token and chat id are required".to_string(),
            });
        }

        let chat = recipient(&self.chat_id).ok_or_else(|| NotificationError::Incomplete {
            channel: self.name(),
            reason: format!("invalid chat id '{}'", self.chat_id),
        })?;

        let text = alert.body_within(MESSAGE_LIMIT);
        if let Cow::Owned(_) = text {
            logger::warning(
                LogTag::Telegram,
                &format!(
                    "Alert for {} wallets exceeds {} characters, sending a trimmed message",
                    alert.wallet_count, MESSAGE_LIMIT
                ),
            );
        }

        #[allow(deprecated)]
        let parse_mode = ParseMode::Markdown;

        self.bot()?
            .send_message(chat, text.into_owned())
            .parse_mode(parse_mode)
            .await?;

        logger::debug(
            LogTag::Telegram,
            &format!("Sent Telegram alert to {}", self.chat_id),
        );
        Ok(())
    }
}
