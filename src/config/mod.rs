//! Configuration system
//!
//! Loaded once at startup from a TOML file with `[API]`, `[MONITORING]` and
//! `[NOTIFICATION]` sections. A missing file is created with defaults.

mod macros;
mod schemas;
mod utils;
mod values;

pub use schemas::{ApiConfig, Config, MonitoringConfig, NotificationConfig};
pub use utils::{write_default_config, ConfigStore, DEFAULT_CONFIG_PATH};
