use crate::database::Chain;
use serde::{Deserialize, Serialize};

/// Wallet found on an entity page, before it is checked against the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateWallet {
    pub address: String,
    pub chain: Chain,
    pub balance: f64,
    pub label: Option<String>,
    /// ISO 8601 extraction time
    pub first_seen: String,
    pub first_transaction: Option<String>,
}

/// The two logical queries issued every cycle
///
/// Both are served by the same entity page today; they are kept apart so each
/// has its own snapshot history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotQuery {
    History,
    Portfolio,
}

impl SnapshotQuery {
    /// Processing order within a cycle
    pub const ALL: [SnapshotQuery; 2] = [SnapshotQuery::History, SnapshotQuery::Portfolio];

    pub fn name(&self) -> &'static str {
        match self {
            SnapshotQuery::History => "history",
            SnapshotQuery::Portfolio => "portfolio",
        }
    }

    /// Snapshot endpoint key, e.g. `/history/entity/usg`
    pub fn endpoint(&self, entity_id: &str) -> String {
        format!("/{}/entity/{}", self.name(), entity_id)
    }
}

/// Result of one successful query
#[derive(Debug, Clone, PartialEq)]
pub struct EntityReport {
    pub entity_id: String,
    pub wallets: Vec<CandidateWallet>,
}

impl EntityReport {
    pub const SOURCE: &'static str = "web_scraping";

    pub fn new(entity_id: impl Into<String>, wallets: Vec<CandidateWallet>) -> Self {
        Self {
            entity_id: entity_id.into(),
            wallets,
        }
    }

    /// Payload stored in `api_responses`
    pub fn to_snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "data": {
                "entity_id": self.entity_id,
                "wallets": self.wallets,
                "source": Self::SOURCE,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(SnapshotQuery::History.endpoint("usg"), "/history/entity/usg");
        assert_eq!(SnapshotQuery::Portfolio.endpoint("usg"), "/portfolio/entity/usg");
    }

    #[test]
    fn test_snapshot_shape() {
        let report = EntityReport::new(
            "usg",
            vec![CandidateWallet {
                address: "bc1qaaa".to_string(),
                chain: Chain::Btc,
                balance: 1.2,
                label: Some("USG Wallet".to_string()),
                first_seen: "2025-03-25T23:00:00+00:00".to_string(),
                first_transaction: None,
            }],
        );

        let snapshot = report.to_snapshot();
        assert_eq!(snapshot["data"]["entity_id"], "usg");
        assert_eq!(snapshot["data"]["source"], "web_scraping");
        assert_eq!(snapshot["data"]["wallets"][0]["address"], "bc1qaaa");
        assert_eq!(snapshot["data"]["wallets"][0]["chain"], "BTC");
        assert!(snapshot["data"]["wallets"][0]["first_transaction"].is_null());
    }
}
