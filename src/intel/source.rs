use super::client::IntelClient;
use super::extractor::WalletExtractor;
use super::types::{EntityReport, SnapshotQuery};
use crate::config::Config;
use crate::errors::MonitorResult;
use crate::logger::{self, LogTag};
use async_trait::async_trait;

/// Anything that can report the wallets of an entity
///
/// `None` means the source had no data this time (network failure, bad
/// status); it is never an error for the caller.
#[async_trait]
pub trait WalletSource: Send + Sync {
    async fn fetch_and_extract(&self, query: SnapshotQuery, entity_id: &str)
        -> Option<EntityReport>;
}

/// Scrapes the public entity page
pub struct IntelSource {
    client: IntelClient,
    extractor: WalletExtractor,
}

impl IntelSource {
    pub fn new(client: IntelClient, extractor: WalletExtractor) -> Self {
        Self { client, extractor }
    }

    pub fn from_config(config: &Config) -> MonitorResult<Self> {
        if !config.api.use_unofficial_api {
            logger::warning(
                LogTag::Intel,
                "API.use_unofficial_api is false but page scraping is the only backend; scraping anyway",
            );
        }

        Ok(Self::new(
            IntelClient::new(&config.api)?,
            WalletExtractor::new(config.monitoring.wallet_label.clone()),
        ))
    }
}

#[async_trait]
impl WalletSource for IntelSource {
    async fn fetch_and_extract(
        &self,
        query: SnapshotQuery,
        entity_id: &str,
    ) -> Option<EntityReport> {
        // History and portfolio share the entity page
        logger::info(
            LogTag::Intel,
            &format!("Scraping entity {} for: {}", query.name(), entity_id),
        );

        let page = self.client.fetch_entity_page(entity_id).await?;
        let wallets = self.extractor.extract(&page);
        Some(EntityReport::new(entity_id, wallets))
    }
}
