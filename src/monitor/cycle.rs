use super::differ::WalletDiffer;
use crate::database::{Database, Wallet};
use crate::errors::MonitorResult;
use crate::intel::{EntityReport, SnapshotQuery, WalletSource};
use crate::logger::{self, LogTag};

/// One fetch → snapshot → diff → persist pass over an entity
pub struct WalletMonitor {
    entity_id: String,
    db: Database,
    source: Box<dyn WalletSource>,
}

impl WalletMonitor {
    pub fn new(entity_id: impl Into<String>, db: Database, source: Box<dyn WalletSource>) -> Self {
        Self {
            entity_id: entity_id.into(),
            db,
            source,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Run one cycle and return the wallets that were new
    ///
    /// Source failures only shrink the result; storage failures abort the cycle.
    pub async fn run_cycle(&self) -> MonitorResult<Vec<Wallet>> {
        logger::info(
            LogTag::Monitor,
            &format!("Starting {} wallet monitoring cycle", self.entity_id.to_uppercase()),
        );

        let mut reports: Vec<(SnapshotQuery, EntityReport)> = Vec::new();
        for query in SnapshotQuery::ALL {
            match self.source.fetch_and_extract(query, &self.entity_id).await {
                Some(report) => reports.push((query, report)),
                None => logger::warning(
                    LogTag::Monitor,
                    &format!("No {} data for entity {}", query.name(), self.entity_id),
                ),
            }
        }

        if reports.is_empty() {
            logger::error(LogTag::Monitor, "Failed to retrieve data from web scraping");
            return Ok(Vec::new());
        }

        for (query, report) in &reports {
            self.db
                .save_snapshot(&query.endpoint(&self.entity_id), &report.to_snapshot())?;
        }

        let mut differ = WalletDiffer::load(&self.db)?;
        let mut new_wallets = Vec::new();
        for (_, report) in &reports {
            new_wallets.extend(differ.diff_and_persist(&report.wallets)?);
        }

        logger::info(
            LogTag::Monitor,
            &format!("Found {} new wallets", new_wallets.len()),
        );
        Ok(new_wallets)
    }
}
