//! Configuration schemas - every section defined once with its defaults
//!
//! The on-disk file uses upper-case section tables (`[API]`, `[MONITORING]`,
//! `[NOTIFICATION]`); field names match the keys written to that file.
//! Boolean and integer fields also accept the quoted spellings understood by
//! [`ConfigStore::get_bool`](super::ConfigStore::get_bool) and
//! [`ConfigStore::get_int`](super::ConfigStore::get_int).
use crate::config_struct;

// ============================================================================
// API CONFIGURATION
// ============================================================================

config_struct! {
    /// Intelligence site access
    pub struct ApiConfig {
        /// Site root used for entity pages and explorer links
        base_url: String = "https://intel.arkm.com".to_string(),

        /// Scraping is the only backend; `false` is accepted and logged
        #[serde(deserialize_with = "super::values::flexible_bool")]
        use_unofficial_api: bool = true,

        #[serde(deserialize_with = "super::values::flexible_int")]
        request_timeout_secs: u64 = 30,
    }
}

// ============================================================================
// MONITORING CONFIGURATION
// ============================================================================

config_struct! {
    /// Polling loop and persistence settings
    pub struct MonitoringConfig {
        #[serde(deserialize_with = "super::values::flexible_int")]
        polling_interval_hours: u64 = 24,

        /// Entity id as it appears in `/explorer/entity/{id}`
        entity_id: String = "usg".to_string(),

        /// Placeholder label stored with every extracted wallet
        wallet_label: String = "USG Wallet".to_string(),

        database_path: String = "usg_wallets.db".to_string(),
        log_file: String = "usg_monitor.log".to_string(),
    }
}

// ============================================================================
// NOTIFICATION CONFIGURATION
// ============================================================================

config_struct! {
    /// Alert channels
    pub struct NotificationConfig {
        // Discord webhook
        discord_webhook: String = String::new(),
        #[serde(deserialize_with = "super::values::flexible_bool")]
        discord_enabled: bool = true,

        // Email over SMTP (STARTTLS)
        #[serde(deserialize_with = "super::values::flexible_bool")]
        enable_email: bool = false,
        /// Comma-separated list
        email_recipients: String = String::new(),
        email_sender: String = String::new(),
        smtp_server: String = String::new(),
        #[serde(deserialize_with = "super::values::flexible_int")]
        smtp_port: u16 = 587,
        smtp_username: String = String::new(),
        smtp_password: String = String::new(),

        // Telegram bot API
        telegram_bot_token: String = String::new(),
        telegram_chat_id: String = String::new(),
        #[serde(deserialize_with = "super::values::flexible_bool")]
        telegram_enabled: bool = false,
        telegram_api_url: String = "https://api.telegram.org".to_string(),
    }
}

impl NotificationConfig {
    /// Recipients split on commas, blanks dropped
    pub fn recipients(&self) -> Vec<String> {
        self.email_recipients
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect()
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

/// Complete application configuration, immutable once loaded
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "API")]
    pub api: ApiConfig,

    #[serde(rename = "MONITORING")]
    pub monitoring: MonitoringConfig,

    #[serde(rename = "NOTIFICATION")]
    pub notification: NotificationConfig,
}

impl Config {
    /// Section names as written to the config file
    pub const SECTIONS: [&'static str; 3] = ["API", "MONITORING", "NOTIFICATION"];

    /// Documented keys for a section, `None` for unknown sections
    pub fn section_keys(section: &str) -> Option<&'static [&'static str]> {
        match section {
            "API" => Some(ApiConfig::KEYS),
            "MONITORING" => Some(MonitoringConfig::KEYS),
            "NOTIFICATION" => Some(NotificationConfig::KEYS),
            _ => None,
        }
    }
}
