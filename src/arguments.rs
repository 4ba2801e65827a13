//! Command-line arguments

use crate::config::{Config, DEFAULT_CONFIG_PATH};
use clap::Parser;
use std::path::PathBuf;

/// Watch an intelligence-site entity for new wallets and send alerts
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "walletwatch", version, about, long_about = None)]
pub struct Arguments {
    /// Configuration file, created with defaults when missing
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Run a single monitoring cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Polling interval in hours, overrides MONITORING.polling_interval_hours
    #[arg(long, value_name = "HOURS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Arguments {
    /// Effective polling interval in hours
    pub fn polling_interval_hours(&self, config: &Config) -> u64 {
        self.interval
            .unwrap_or(config.monitoring.polling_interval_hours)
    }
}
