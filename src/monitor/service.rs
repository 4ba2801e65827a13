use super::cycle::WalletMonitor;
use crate::database::Wallet;
use crate::errors::MonitorResult;
use crate::logger::{self, LogTag};
use crate::notifications::Notifier;
use crate::shutdown::ShutdownSignal;
use std::sync::Arc;
use std::time::Duration;

/// Delay before retrying after a failed cycle
pub const ERROR_RETRY_DELAY: Duration = Duration::from_secs(300);

/// How the driver loop runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    pub interval: Duration,
    /// Exactly one cycle, no sleeping
    pub once: bool,
    pub error_retry: Duration,
}

impl ScheduleSettings {
    pub fn every_hours(hours: u64) -> Self {
        Self {
            interval: Duration::from_secs(hours.max(1).saturating_mul(3600)),
            once: false,
            error_retry: ERROR_RETRY_DELAY,
        }
    }

    pub fn once() -> Self {
        Self {
            once: true,
            ..Self::every_hours(1)
        }
    }
}

/// How a cycle ended
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Cycle finished; `notified` is `false` when nothing was new or no channel delivered
    Completed { new_wallets: Vec<Wallet>, notified: bool },
    Interrupted,
}

/// Driver loop: cycle, notify, sleep, repeat
pub struct MonitorService {
    monitor: WalletMonitor,
    notifier: Notifier,
    settings: ScheduleSettings,
    shutdown: Arc<ShutdownSignal>,
}

impl MonitorService {
    pub fn new(
        monitor: WalletMonitor,
        notifier: Notifier,
        settings: ScheduleSettings,
        shutdown: Arc<ShutdownSignal>,
    ) -> Self {
        Self {
            monitor,
            notifier,
            settings,
            shutdown,
        }
    }

    pub fn monitor(&self) -> &WalletMonitor {
        &self.monitor
    }

    /// Cycle plus notification, abandoned as soon as shutdown is requested
    pub async fn run_once(&self) -> MonitorResult<CycleOutcome> {
        tokio::select! {
            result = self.cycle_and_notify() => result,
            _ = self.shutdown.wait() => Ok(CycleOutcome::Interrupted),
        }
    }

    async fn cycle_and_notify(&self) -> MonitorResult<CycleOutcome> {
        let new_wallets = self.monitor.run_cycle().await?;

        let notified = if new_wallets.is_empty() {
            logger::info(LogTag::Monitor, "No new wallets detected");
            false
        } else {
            logger::info(
                LogTag::Monitor,
                &format!("Sending notification for {} new wallets", new_wallets.len()),
            );
            let sent = self.notifier.notify(&new_wallets).await;
            if !sent {
                logger::warning(LogTag::Notify, "No notification channel delivered the alert");
            }
            sent
        };

        Ok(CycleOutcome::Completed {
            new_wallets,
            notified,
        })
    }

    /// Run until shutdown, or for a single cycle in `once` mode
    ///
    /// In `once` mode a failed cycle is returned as the error. Otherwise errors
    /// are logged and retried after `error_retry`.
    pub async fn run(&self) -> MonitorResult<()> {
        logger::info(
            LogTag::Monitor,
            &format!(
                "Monitoring entity '{}' {}",
                self.monitor.entity_id(),
                if self.settings.once {
                    "for a single cycle".to_string()
                } else {
                    format!("every {}", format_duration(self.settings.interval))
                }
            ),
        );

        loop {
            if self.shutdown.is_requested() {
                break;
            }

            let delay = match self.run_once().await {
                Ok(CycleOutcome::Interrupted) => break,
                Ok(CycleOutcome::Completed { .. }) => {
                    if self.settings.once {
                        break;
                    }
                    self.settings.interval
                }
                Err(e) => {
                    logger::error(LogTag::Monitor, &format!("Monitoring cycle failed: {}", e));
                    if self.settings.once {
                        return Err(e);
                    }
                    self.settings.error_retry
                }
            };

            logger::info(
                LogTag::Monitor,
                &format!("Next check in {}", format_duration(delay)),
            );

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.shutdown.wait() => break,
            }
        }

        logger::info(LogTag::Monitor, "Monitoring stopped");
        Ok(())
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
