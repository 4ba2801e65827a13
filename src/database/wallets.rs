use super::models::{Chain, Wallet};
use super::Database;
use crate::errors::MonitorResult;
use crate::logger::{self, LogTag};
use rusqlite::{params, OptionalExtension, Row};
use std::collections::HashSet;

impl Database {
    /// Every wallet address currently stored
    pub fn known_addresses(&self) -> MonitorResult<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT address FROM wallets")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut addresses = HashSet::new();
        for address in rows {
            addresses.insert(address?);
        }
        Ok(addresses)
    }

    /// Insert a wallet, replacing any existing row with the same address
    pub fn save_wallet(&self, wallet: &Wallet) -> MonitorResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO wallets
                (address, chain, first_seen, first_transaction, label, balance, raw_data)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                wallet.address,
                wallet.chain.as_str(),
                wallet.first_seen,
                wallet.first_transaction,
                wallet.label,
                wallet.balance,
                wallet.raw_data,
            ],
        )?;

        logger::debug(
            LogTag::Database,
            &format!("Saved wallet: {}", wallet.address),
        );
        Ok(())
    }

    /// Look up a single wallet by address
    pub fn get_wallet(&self, address: &str) -> MonitorResult<Option<Wallet>> {
        let wallet = self
            .conn
            .query_row(
                "SELECT address, chain, first_seen, first_transaction, label, balance, raw_data
                 FROM wallets WHERE address = ?1",
                params![address],
                wallet_from_row,
            )
            .optional()?;
        Ok(wallet)
    }

    /// Total number of stored wallets
    pub fn wallet_count(&self) -> MonitorResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM wallets", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

fn wallet_from_row(row: &Row<'_>) -> rusqlite::Result<Wallet> {
    let chain: String = row.get(1)?;
    Ok(Wallet {
        address: row.get(0)?,
        chain: Chain::from_ticker(&chain),
        first_seen: row.get(2)?,
        first_transaction: row.get(3)?,
        label: row.get(4)?,
        balance: row.get(5)?,
        raw_data: row.get(6)?,
    })
}
