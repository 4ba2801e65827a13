use serde::{Deserialize, Serialize};
use std::fmt;

/// Chain a wallet lives on, as far as the page tells us
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "USDT")]
    Usdt,
    #[serde(rename = "SOL")]
    Sol,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl Chain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Btc => "BTC",
            Chain::Eth => "ETH",
            Chain::Usdt => "USDT",
            Chain::Sol => "SOL",
            Chain::Unknown => "unknown",
        }
    }

    /// Case-insensitive ticker lookup; anything unrecognised is `Unknown`
    pub fn from_ticker(ticker: &str) -> Chain {
        match ticker.trim().to_uppercase().as_str() {
            "BTC" => Chain::Btc,
            "ETH" => Chain::Eth,
            "USDT" => Chain::Usdt,
            "SOL" => Chain::Sol,
            _ => Chain::Unknown,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted wallet row (`wallets` table, address is the primary key)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub address: String,
    pub chain: Chain,
    /// ISO 8601, when this system first recorded the address
    pub first_seen: String,
    /// ISO 8601, source-provided when available
    pub first_transaction: Option<String>,
    pub label: Option<String>,
    pub balance: Option<f64>,
    /// JSON copy of the source record, audit only
    pub raw_data: Option<String>,
}

/// One row of the append-only `api_responses` log
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponseSnapshot {
    pub id: i64,
    pub endpoint: String,
    pub response: serde_json::Value,
    pub timestamp: String,
}
