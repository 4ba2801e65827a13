use super::message::Alert;
use super::NotificationChannel;
use crate::config::NotificationConfig;
use crate::errors::NotificationError;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// SMTP channel: STARTTLS, authenticated, plain text plus HTML alternative
pub struct EmailChannel {
    enabled: bool,
    server: String,
    port: u16,
    username: String,
    password: String,
    sender: String,
    recipients: Vec<String>,
}

impl EmailChannel {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            enabled: config.enable_email,
            server: config.smtp_server.trim().to_string(),
            port: config.smtp_port,
            username: config.smtp_username.trim().to_string(),
            password: config.smtp_password.clone(),
            sender: config.email_sender.trim().to_string(),
            recipients: config.recipients(),
        }
    }

    /// Names of required settings that are blank
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.server.is_empty() {
            missing.push("smtp_server");
        }
        if self.username.is_empty() {
            missing.push("smtp_username");
        }
        if self.password.is_empty() {
            missing.push("smtp_password");
        }
        if self.sender.is_empty() {
            missing.push("email_sender");
        }
        if self.recipients.is_empty() {
            missing.push("email_recipients");
        }
        missing
    }

    pub fn build_message(&self, alert: &Alert) -> Result<Message, NotificationError> {
        let mut builder = Message::builder()
            .from(self.sender.parse::<Mailbox>()?)
            .subject(alert.subject());

        for recipient in &self.recipients {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }

        let message = builder.multipart(MultiPart::alternative_plain_html(
            alert.body.clone(),
            alert.html_body(),
        ))?;
        Ok(message)
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, alert: &Alert) -> Result<(), NotificationError> {
        let missing = self.missing_settings();
        if !missing.is_empty() {
            return Err(NotificationError::Incomplete {
                channel: self.name(),
                reason: format!("missing {}", missing.join(", ")),
            });
        }

        let message = self.build_message(alert)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.server)?
            .port(self.port)
            .credentials(Credentials::new(
                self.username.clone(),
                self.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        mailer.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> NotificationConfig {
        NotificationConfig {
            enable_email: true,
            smtp_server: "smtp.example.com".to_string(),
            smtp_username: "monitor".to_string(),
            smtp_password: "secret".to_string(),
            email_sender: "monitor@example.com".to_string(),
            email_recipients: "ops@example.com, oncall@example.com".to_string(),
            ..Default::default()
        }
    }

    fn alert() -> Alert {
        Alert::compose("usg", "https://intel.arkm.com", &[], "2025-03-25 23:00:00")
    }

    #[test]
    fn test_complete_config_has_nothing_missing() {
        let channel = EmailChannel::new(&complete_config());
        assert!(channel.missing_settings().is_empty());
        assert!(channel.is_enabled());
    }

    #[test]
    fn test_each_blank_field_is_reported() {
        let config = NotificationConfig {
            smtp_password: String::new(),
            email_recipients: " , ".to_string(),
            ..complete_config()
        };
        let channel = EmailChannel::new(&config);
        assert_eq!(
            channel.missing_settings(),
            vec!["smtp_password", "email_recipients"]
        );
    }

    #[tokio::test]
    async fn test_incomplete_config_skips_smtp() {
        let config = NotificationConfig {
            smtp_server: String::new(),
            ..complete_config()
        };
        let channel = EmailChannel::new(&config);

        let err = channel.send(&alert()).await.unwrap_err();
        assert!(matches!(err, NotificationError::Incomplete { channel: "email", .. }));
    }

    #[test]
    fn test_message_is_multipart_alternative() {
        let channel = EmailChannel::new(&complete_config());
        let message = channel.build_message(&alert()).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("ops@example.com"));
        assert!(raw.contains("oncall@example.com"));
    }

    #[test]
    fn test_invalid_sender_is_rejected() {
        let config = NotificationConfig {
            email_sender: "not an address".to_string(),
            ..complete_config()
        };
        let channel = EmailChannel::new(&config);
        assert!(matches!(
            channel.build_message(&alert()),
            Err(NotificationError::Address(_))
        ));
    }
}
