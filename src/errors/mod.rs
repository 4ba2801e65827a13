//! Structured error handling for walletwatch
//!
//! Every fallible operation outside the notification channels returns
//! [`MonitorError`]. Channel failures use [`NotificationError`] so they can be
//! logged and discarded without touching the cycle result.
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type MonitorResult<T> = std::result::Result<T, MonitorError>;

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

#[derive(Debug, Error)]
pub enum MonitorError {
    /// Configuration file could not be created, read, parsed, or validated
    #[error("Configuration Error: {0}")]
    Config(String),

    /// SQLite failure - fatal for the current cycle
    #[error("Storage Error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// HTTP client construction or transport failure
    #[error("Network Error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON encoding of snapshots and raw wallet data
    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure (config bootstrap, log file)
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    pub fn config(message: impl Into<String>) -> Self {
        MonitorError::Config(message.into())
    }
}

// =============================================================================
// NOTIFICATION ERROR TYPES
// =============================================================================

#[derive(Debug, Error)]
pub enum NotificationError {
    /// Channel is enabled but a required setting is blank
    #[error("{channel} configuration incomplete: {reason}")]
    Incomplete {
        channel: &'static str,
        reason: String,
    },

    /// Remote endpoint answered with something other than the success status
    #[error("{channel} returned HTTP {status}: {body}")]
    UnexpectedStatus {
        channel: &'static str,
        status: u16,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build email: {0}")]
    EmailBuild(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Bot API rejected the message or could not be reached
    #[error("Telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),
}
