//! End-to-end monitoring cycles with scripted sources and recording channels.

mod common;

use async_trait::async_trait;
use common::{candidate, entity_page, Responder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use walletwatch::config::Config;
use walletwatch::database::{Chain, Database};
use walletwatch::errors::{MonitorError, NotificationError};
use walletwatch::intel::{CandidateWallet, EntityReport, SnapshotQuery, WalletSource};
use walletwatch::monitor::{CycleOutcome, MonitorService, ScheduleSettings, WalletMonitor};
use walletwatch::notifications::{Alert, NotificationChannel, Notifier};
use walletwatch::run::build_service;
use walletwatch::shutdown::ShutdownSignal;

/// Serves whatever wallet list is currently set, for both queries
#[derive(Clone, Default)]
struct ScriptedSource {
    wallets: Arc<Mutex<Option<Vec<CandidateWallet>>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn set(&self, wallets: Vec<CandidateWallet>) {
        *self.wallets.lock().unwrap() = Some(wallets);
    }

    fn fail(&self) {
        *self.wallets.lock().unwrap() = None;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletSource for ScriptedSource {
    async fn fetch_and_extract(
        &self,
        _query: SnapshotQuery,
        entity_id: &str,
    ) -> Option<EntityReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let wallets = self.wallets.lock().unwrap().clone()?;
        Some(EntityReport::new(entity_id, wallets))
    }
}

#[derive(Clone, Default)]
struct RecordingChannel {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, alert: &Alert) -> Result<(), NotificationError> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

fn service(
    source: &ScriptedSource,
    channel: &RecordingChannel,
    settings: ScheduleSettings,
    shutdown: Arc<ShutdownSignal>,
) -> MonitorService {
    service_over(
        Database::open_in_memory().unwrap(),
        source,
        channel,
        settings,
        shutdown,
    )
}

fn service_over(
    db: Database,
    source: &ScriptedSource,
    channel: &RecordingChannel,
    settings: ScheduleSettings,
    shutdown: Arc<ShutdownSignal>,
) -> MonitorService {
    let monitor = WalletMonitor::new("usg", db, Box::new(source.clone()));
    let notifier = Notifier::with_channels(
        "usg",
        "https://intel.arkm.com",
        vec![Box::new(channel.clone())],
    );
    MonitorService::new(monitor, notifier, settings, shutdown)
}

fn new_addresses(outcome: &CycleOutcome) -> Vec<String> {
    match outcome {
        CycleOutcome::Completed { new_wallets, .. } => {
            new_wallets.iter().map(|w| w.address.clone()).collect()
        }
        CycleOutcome::Interrupted => panic!("cycle was interrupted"),
    }
}

#[tokio::test]
async fn test_two_cycles_report_only_new_wallets() {
    let source = ScriptedSource::default();
    let channel = RecordingChannel::default();
    let service = service(&source, &channel, ScheduleSettings::once(), ShutdownSignal::new());

    source.set(vec![
        candidate("A", Chain::Btc, 1.2),
        candidate("B", Chain::Unknown, 0.0),
    ]);
    let first = service.run_once().await.unwrap();
    assert_eq!(new_addresses(&first), vec!["A", "B"]);
    assert!(matches!(first, CycleOutcome::Completed { notified: true, .. }));

    let db = service.monitor().database();
    let a = db.get_wallet("A").unwrap().unwrap();
    assert_eq!(a.chain, Chain::Btc);
    assert_eq!(a.balance, Some(1.2));
    let b = db.get_wallet("B").unwrap().unwrap();
    assert_eq!(b.chain, Chain::Unknown);
    assert_eq!(b.balance, Some(0.0));

    source.set(vec![
        candidate("A", Chain::Btc, 1.2),
        candidate("C", Chain::Eth, 3.0),
    ]);
    let second = service.run_once().await.unwrap();
    assert_eq!(new_addresses(&second), vec!["C"]);
    assert_eq!(db.wallet_count().unwrap(), 3);

    let alerts = channel.alerts.lock().unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].wallet_count, 2);
    assert!(alerts[0].body.contains("`A`") && alerts[0].body.contains("`B`"));
    assert_eq!(alerts[1].wallet_count, 1);
    assert!(alerts[1].body.contains("`C`") && !alerts[1].body.contains("`A`"));
}

#[tokio::test]
async fn test_each_query_is_snapshotted() {
    let source = ScriptedSource::default();
    let channel = RecordingChannel::default();
    let service = service(&source, &channel, ScheduleSettings::once(), ShutdownSignal::new());

    source.set(vec![candidate("A", Chain::Btc, 1.2)]);
    service.run_once().await.unwrap();
    service.run_once().await.unwrap();

    let db = service.monitor().database();
    assert_eq!(db.snapshot_count("/history/entity/usg").unwrap(), 2);
    assert_eq!(db.snapshot_count("/portfolio/entity/usg").unwrap(), 2);

    let latest = db.latest_snapshot("/history/entity/usg").unwrap().unwrap();
    assert_eq!(latest["data"]["wallets"][0]["address"], "A");
    assert_eq!(latest["data"]["source"], "web_scraping");
}

#[tokio::test]
async fn test_failed_source_reports_nothing_and_notifies_nobody() {
    let source = ScriptedSource::default();
    let channel = RecordingChannel::default();
    let service = service(&source, &channel, ScheduleSettings::once(), ShutdownSignal::new());

    source.fail();
    let outcome = service.run_once().await.unwrap();
    assert!(new_addresses(&outcome).is_empty());
    assert_eq!(
        service.monitor().database().snapshot_count("/history/entity/usg").unwrap(),
        0
    );
    assert!(channel.alerts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_once_runs_exactly_one_cycle() {
    let source = ScriptedSource::default();
    let channel = RecordingChannel::default();
    let settings = ScheduleSettings {
        interval: Duration::from_secs(3600),
        ..ScheduleSettings::once()
    };
    let service = service(&source, &channel, settings, ShutdownSignal::new());
    source.set(vec![candidate("A", Chain::Btc, 1.2)]);

    tokio::time::timeout(Duration::from_secs(5), service.run())
        .await
        .expect("--once must not sleep")
        .unwrap();

    // One cycle is one call per query
    assert_eq!(source.calls(), 2);
    assert_eq!(channel.alerts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_shutdown_before_start_runs_no_cycle() {
    let source = ScriptedSource::default();
    let channel = RecordingChannel::default();
    let shutdown = ShutdownSignal::new();
    shutdown.request();

    let service = service(&source, &channel, ScheduleSettings::every_hours(24), shutdown);
    tokio::time::timeout(Duration::from_secs(5), service.run())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_shutdown_interrupts_sleep() {
    let source = ScriptedSource::default();
    let channel = RecordingChannel::default();
    let shutdown = ShutdownSignal::new();
    let service = service(
        &source,
        &channel,
        ScheduleSettings::every_hours(24),
        Arc::clone(&shutdown),
    );
    source.set(vec![candidate("A", Chain::Btc, 1.2)]);

    let stopper = async {
        while source.calls() < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        shutdown.request();
    };

    let (result, _) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(service.run(), stopper)
    })
    .await
    .expect("shutdown must end the 24h sleep");

    result.unwrap();
    assert_eq!(source.calls(), 2);
}

/// File-backed store whose `wallets` table is dropped behind the service's back
fn broken_store(dir: &TempDir) -> Database {
    let path = dir.path().join("wallets.db");
    let db = Database::open(&path).unwrap();
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute("DROP TABLE wallets", [])
        .unwrap();
    db
}

#[tokio::test]
async fn test_storage_failure_ends_once_mode_with_error() {
    let dir = TempDir::new().unwrap();
    let source = ScriptedSource::default();
    let channel = RecordingChannel::default();
    let service = service_over(
        broken_store(&dir),
        &source,
        &channel,
        ScheduleSettings::once(),
        ShutdownSignal::new(),
    );
    source.set(vec![candidate("A", Chain::Btc, 1.2)]);

    let result = tokio::time::timeout(Duration::from_secs(5), service.run())
        .await
        .expect("--once must not retry");

    assert!(matches!(result, Err(MonitorError::Storage(_))));
    assert_eq!(source.calls(), 2);
    assert!(channel.alerts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_is_retried_until_shutdown() {
    let dir = TempDir::new().unwrap();
    let source = ScriptedSource::default();
    let channel = RecordingChannel::default();
    let shutdown = ShutdownSignal::new();
    let settings = ScheduleSettings {
        error_retry: Duration::from_millis(10),
        ..ScheduleSettings::every_hours(24)
    };
    let service = service_over(
        broken_store(&dir),
        &source,
        &channel,
        settings,
        Arc::clone(&shutdown),
    );
    source.set(vec![candidate("A", Chain::Btc, 1.2)]);

    // A second cycle means the failure was followed by the short retry delay
    let stopper = async {
        while source.calls() < 4 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        shutdown.request();
    };

    let (result, _) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(service.run(), stopper)
    })
    .await
    .expect("storage errors must be retried after error_retry, not the interval");

    result.unwrap();
    assert!(source.calls() >= 4);
    assert!(channel.alerts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_wired_service_against_local_site() {
    let server = Responder::start().await;
    server.route(
        "GET",
        "/explorer/entity/usg",
        200,
        entity_page(&[("bc1qaaa", "BTC", "$1.2"), ("0xbbb", "", "")]),
    );
    server.route("POST", "/webhook", 204, "");

    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.api.base_url = server.url();
    config.api.request_timeout_secs = 5;
    config.monitoring.database_path = dir.path().join("wallets.db").display().to_string();
    config.notification.discord_webhook = format!("{}/webhook", server.url());

    let service = build_service(&config, ScheduleSettings::once(), ShutdownSignal::new()).unwrap();
    let first = service.run_once().await.unwrap();
    assert_eq!(new_addresses(&first), vec!["bc1qaaa", "0xbbb"]);
    assert_eq!(server.requests_to("/explorer/entity/usg").len(), 2);
    assert_eq!(server.requests_to("/webhook").len(), 1);
    drop(service);

    // A fresh process over the same database only reports the newcomer
    server.route(
        "GET",
        "/explorer/entity/usg",
        200,
        entity_page(&[("bc1qaaa", "BTC", "$1.2"), ("0xccc", "SOL", "$10")]),
    );
    let service = build_service(&config, ScheduleSettings::once(), ShutdownSignal::new()).unwrap();
    tokio::time::timeout(Duration::from_secs(10), service.run())
        .await
        .unwrap()
        .unwrap();

    let db = Database::open(&config.monitoring.database_path).unwrap();
    assert_eq!(db.wallet_count().unwrap(), 3);
    assert_eq!(db.get_wallet("0xccc").unwrap().unwrap().chain, Chain::Sol);
    assert_eq!(server.requests_to("/webhook").len(), 2);
}
