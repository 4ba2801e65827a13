/// Log tags identify the subsystem a message comes from
///
/// The tag travels as the `log` record target, so the console and file
/// formatters can recover it from any record.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Database,
    Intel,
    Extractor,
    Monitor,
    Notify,
    Discord,
    Telegram,
    Email,
}

impl LogTag {
    pub const ALL: [LogTag; 10] = [
        LogTag::System,
        LogTag::Config,
        LogTag::Database,
        LogTag::Intel,
        LogTag::Extractor,
        LogTag::Monitor,
        LogTag::Notify,
        LogTag::Discord,
        LogTag::Telegram,
        LogTag::Email,
    ];

    /// Target string used on `log` records
    pub fn target(&self) -> &'static str {
        match self {
            LogTag::System => "walletwatch::system",
            LogTag::Config => "walletwatch::config",
            LogTag::Database => "walletwatch::database",
            LogTag::Intel => "walletwatch::intel",
            LogTag::Extractor => "walletwatch::extractor",
            LogTag::Monitor => "walletwatch::monitor",
            LogTag::Notify => "walletwatch::notify",
            LogTag::Discord => "walletwatch::discord",
            LogTag::Telegram => "walletwatch::telegram",
            LogTag::Email => "walletwatch::email",
        }
    }

    /// Short upper-case label shown in log lines
    pub fn label(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Database => "DATABASE",
            LogTag::Intel => "INTEL",
            LogTag::Extractor => "EXTRACT",
            LogTag::Monitor => "MONITOR",
            LogTag::Notify => "NOTIFY",
            LogTag::Discord => "DISCORD",
            LogTag::Telegram => "TELEGRAM",
            LogTag::Email => "EMAIL",
        }
    }

    pub fn from_target(target: &str) -> Option<LogTag> {
        LogTag::ALL.iter().copied().find(|tag| tag.target() == target)
    }
}
