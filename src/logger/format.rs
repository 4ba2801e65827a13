//! Log line formatting for the console and the log file
//!
//! Console lines are colorized with a dimmed clock, a colored tag and level.
//! File lines carry a full timestamp and no ANSI codes. Records coming from
//! dependencies (no [`LogTag`] target) are labelled with their crate name.

use super::tags::LogTag;
use chrono::Local;
use colored::*;
use log::Level;

/// Tag column width for alignment
const TAG_WIDTH: usize = 9;

/// Level column width for alignment
const LEVEL_WIDTH: usize = 7;

/// Format a colored console line
pub fn console_line(target: &str, level: Level, message: &std::fmt::Arguments) -> String {
    let time = Local::now().format("%H:%M:%S").to_string();
    format!(
        "{} [{}] [{}] {}",
        time.dimmed(),
        format_tag(target),
        format_level(level),
        format_message(level, &message.to_string())
    )
}

/// Format a plain file line
pub fn file_line(target: &str, level: Level, message: &std::fmt::Arguments) -> String {
    format!(
        "{} [{}] [{}] {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        plain_tag(target),
        level_name(level),
        message
    )
}

/// Tag label for a record target
pub fn plain_tag(target: &str) -> String {
    match LogTag::from_target(target) {
        Some(tag) => tag.label().to_string(),
        None => target
            .split("::")
            .next()
            .unwrap_or(target)
            .to_uppercase(),
    }
}

/// Level name matching the tagged logger API (WARN is shown as WARNING)
pub fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "VERBOSE",
    }
}

fn format_tag(target: &str) -> ColoredString {
    let padded = format!("{:<width$}", plain_tag(target), width = TAG_WIDTH);
    match LogTag::from_target(target) {
        Some(LogTag::System) => padded.bright_yellow().bold(),
        Some(LogTag::Config) => padded.bright_white().bold(),
        Some(LogTag::Database) => padded.bright_blue().bold(),
        Some(LogTag::Intel) => padded.bright_cyan().bold(),
        Some(LogTag::Extractor) => padded.cyan().bold(),
        Some(LogTag::Monitor) => padded.bright_green().bold(),
        Some(LogTag::Notify) => padded.bright_magenta().bold(),
        Some(LogTag::Discord) => padded.bright_purple().bold(),
        Some(LogTag::Telegram) => padded.bright_blue().bold(),
        Some(LogTag::Email) => padded.magenta().bold(),
        None => padded.white().dimmed(),
    }
}

fn format_level(level: Level) -> ColoredString {
    let padded = format!("{:<width$}", level_name(level), width = LEVEL_WIDTH);
    match level {
        Level::Error => padded.bright_red().bold(),
        Level::Warn => padded.bright_yellow().bold(),
        Level::Info => padded.white().bold(),
        Level::Debug => padded.purple(),
        Level::Trace => padded.dimmed(),
    }
}

fn format_message(level: Level, message: &str) -> ColoredString {
    match level {
        Level::Error => message.red(),
        Level::Warn => message.yellow(),
        Level::Debug | Level::Trace => message.dimmed(),
        Level::Info => message.normal(),
    }
}
