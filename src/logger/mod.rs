//! Structured logging for walletwatch
//!
//! Call sites use a small tagged API on top of the `log` facade:
//!
//! ```ignore
//! use walletwatch::logger::{self, LogTag};
//!
//! logger::info(LogTag::Monitor, "Found 2 new wallets");
//! logger::warning(LogTag::Discord, "Webhook URL not configured");
//! logger::debug(LogTag::Extractor, "Raw candidate: ..."); // only with --verbose
//! ```
//!
//! [`init`] installs a `fern` dispatcher once at startup with two outputs:
//! - colored console (errors and warnings on stderr, everything else on stdout)
//! - plain-text append-only log file
//!
//! Dependency crates are capped at WARNING so HTTP and SMTP internals stay quiet.

mod format;
mod tags;

pub use tags::LogTag;

use crate::errors::{MonitorError, MonitorResult};
use log::{Level, LevelFilter};
use std::path::PathBuf;

/// Logger settings derived from the CLI and configuration
#[derive(Debug, Clone)]
pub struct LoggerSettings {
    /// Enables DEBUG level for walletwatch targets
    pub verbose: bool,

    /// Log file, `None` for console-only output
    pub log_file: Option<PathBuf>,
}

/// Initialize the logger system
///
/// Must be called once, before any logging occurs.
///
/// # Errors
/// - `MonitorError::Io` if the log file cannot be opened for appending
/// - `MonitorError::Config` if a global logger is already installed
pub fn init(settings: &LoggerSettings) -> MonitorResult<()> {
    let level = if settings.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                format::console_line(record.target(), record.level(), message)
            ))
        })
        .chain(
            fern::Dispatch::new()
                .filter(|metadata| metadata.level() <= Level::Warn)
                .chain(std::io::stderr()),
        )
        .chain(
            fern::Dispatch::new()
                .filter(|metadata| metadata.level() > Level::Warn)
                .chain(std::io::stdout()),
        );

    let mut dispatch = fern::Dispatch::new()
        .level(level)
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .level_for("lettre", LevelFilter::Warn)
        .chain(console);

    if let Some(path) = &settings.log_file {
        let file = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{}",
                    format::file_line(record.target(), record.level(), message)
                ))
            })
            .chain(fern::log_file(path)?);
        dispatch = dispatch.chain(file);
    }

    dispatch
        .apply()
        .map_err(|e| MonitorError::config(format!("Logger already initialized: {}", e)))
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    log_tagged(tag, Level::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    log_tagged(tag, Level::Warn, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    log_tagged(tag, Level::Info, message);
}

/// Log at DEBUG level, shown only with --verbose
pub fn debug(tag: LogTag, message: &str) {
    log_tagged(tag, Level::Debug, message);
}

/// Flush pending writes on every output
///
/// Call during shutdown so the log file is complete.
pub fn flush() {
    log::logger().flush();
}

fn log_tagged(tag: LogTag, level: Level, message: &str) {
    log::log!(target: tag.target(), level, "{}", message);
}
