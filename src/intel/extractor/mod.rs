//! Wallet extraction from entity page markup
//!
//! Extraction is an ordered chain of [`ExtractionStrategy`] implementations.
//! The first strategy that finds anything wins; later strategies are only
//! fallbacks. Results are deduplicated by address, keeping page order.
//!
//! Matching is pattern based and will miss wallets when the page layout
//! changes. An empty result is not an error.

mod links;
mod scripts;

pub use links::AddressLinkStrategy;
pub use scripts::EmbeddedScriptStrategy;

use super::types::CandidateWallet;
use crate::database::Chain;
use crate::logger::{self, LogTag};
use chrono::Utc;
use std::collections::HashSet;

/// Wallet fields a strategy can read off the page
#[derive(Debug, Clone, PartialEq)]
pub struct PageWallet {
    pub address: String,
    pub chain: Chain,
    pub balance: f64,
}

impl PageWallet {
    /// Address only: chain `unknown`, balance 0
    pub fn bare(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            chain: Chain::Unknown,
            balance: 0.0,
        }
    }
}

/// One way of finding wallets in a page
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, page: &str) -> Vec<PageWallet>;
}

/// Ordered strategy chain
pub struct WalletExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    label: String,
}

impl WalletExtractor {
    /// Links first, embedded scripts as fallback
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_strategies(
            label,
            vec![
                Box::new(AddressLinkStrategy),
                Box::new(EmbeddedScriptStrategy),
            ],
        )
    }

    pub fn with_strategies(
        label: impl Into<String>,
        strategies: Vec<Box<dyn ExtractionStrategy>>,
    ) -> Self {
        Self {
            strategies,
            label: label.into(),
        }
    }

    pub fn extract(&self, page: &str) -> Vec<CandidateWallet> {
        let first_seen = Utc::now().to_rfc3339();

        for strategy in &self.strategies {
            let found = strategy.extract(page);
            if found.is_empty() {
                logger::debug(
                    LogTag::Extractor,
                    &format!("Strategy '{}' found no wallets", strategy.name()),
                );
                continue;
            }

            let wallets: Vec<CandidateWallet> = dedup_by_address(found)
                .into_iter()
                .map(|w| CandidateWallet {
                    address: w.address,
                    chain: w.chain,
                    balance: w.balance,
                    label: Some(self.label.clone()),
                    first_seen: first_seen.clone(),
                    first_transaction: None,
                })
                .collect();

            logger::info(
                LogTag::Extractor,
                &format!(
                    "Extracted {} wallets from page via '{}'",
                    wallets.len(),
                    strategy.name()
                ),
            );
            return wallets;
        }

        logger::info(LogTag::Extractor, "Extracted 0 wallets from page");
        Vec::new()
    }
}

fn dedup_by_address(wallets: Vec<PageWallet>) -> Vec<PageWallet> {
    let mut seen = HashSet::new();
    wallets
        .into_iter()
        .filter(|w| seen.insert(w.address.clone()))
        .collect()
}
