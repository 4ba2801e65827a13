//! Wallet monitoring: per-cycle diffing and the polling driver

mod cycle;
mod differ;
mod service;

pub use cycle::WalletMonitor;
pub use differ::WalletDiffer;
pub use service::{CycleOutcome, MonitorService, ScheduleSettings, ERROR_RETRY_DELAY};
