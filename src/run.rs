//! Application wiring: configuration, logging, storage, source, channels, driver

use crate::arguments::Arguments;
use crate::config::{Config, ConfigStore};
use crate::database::Database;
use crate::errors::MonitorResult;
use crate::intel::IntelSource;
use crate::logger::{self, LogTag, LoggerSettings};
use crate::monitor::{MonitorService, ScheduleSettings, WalletMonitor};
use crate::notifications::Notifier;
use crate::shutdown::ShutdownSignal;
use std::path::PathBuf;
use std::sync::Arc;

/// Build the driver for `config`
///
/// Opens (or creates) the database and constructs the scraping source and
/// every notification channel.
pub fn build_service(
    config: &Config,
    schedule: ScheduleSettings,
    shutdown: Arc<ShutdownSignal>,
) -> MonitorResult<MonitorService> {
    let db = Database::open(&config.monitoring.database_path)?;
    let source = IntelSource::from_config(config)?;
    let notifier = Notifier::from_config(config)?;

    let channels = notifier.enabled_channels();
    if channels.is_empty() {
        logger::warning(LogTag::Notify, "No notification channels enabled");
    } else {
        logger::info(
            LogTag::Notify,
            &format!("Notification channels: {}", channels.join(", ")),
        );
    }

    let monitor = WalletMonitor::new(&config.monitoring.entity_id, db, Box::new(source));
    Ok(MonitorService::new(monitor, notifier, schedule, shutdown))
}

/// Entry point used by the binary
pub async fn run(args: Arguments) -> anyhow::Result<()> {
    let store = ConfigStore::load_or_create(&args.config)?;
    let config = store.shared();

    let log_file = config.monitoring.log_file.trim();
    logger::init(&LoggerSettings {
        verbose: args.verbose,
        log_file: (!log_file.is_empty()).then(|| PathBuf::from(log_file)),
    })?;

    logger::info(LogTag::System, "🚀 walletwatch starting up");
    if store.was_created() {
        logger::info(
            LogTag::Config,
            &format!("Created default configuration file: {}", store.path().display()),
        );
    }
    logger::debug(LogTag::Config, &format!("Loaded configuration: {:?}", config.monitoring));
    for key in store.unknown_keys() {
        logger::warning(LogTag::Config, &format!("Ignoring unknown config key: {}", key));
    }

    let shutdown = ShutdownSignal::new();
    shutdown.install_handlers()?;

    let schedule = if args.once {
        ScheduleSettings::once()
    } else {
        ScheduleSettings::every_hours(args.polling_interval_hours(&config))
    };

    let result = match build_service(&config, schedule, Arc::clone(&shutdown)) {
        Ok(service) => service.run().await,
        Err(e) => Err(e),
    };

    if shutdown.is_requested() {
        logger::info(LogTag::System, "Shutdown requested, exiting");
    }
    logger::flush();

    result?;
    Ok(())
}
