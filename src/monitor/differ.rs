use crate::database::{Database, Wallet};
use crate::errors::MonitorResult;
use crate::intel::CandidateWallet;
use crate::logger::{self, LogTag};
use chrono::Utc;
use std::collections::HashSet;

/// Per-cycle diff against the store
///
/// The known-address set is read once when the differ is created and grows
/// as new wallets are persisted, so feeding several candidate lists through
/// the same differ never reports an address twice.
pub struct WalletDiffer<'a> {
    db: &'a Database,
    known: HashSet<String>,
}

impl<'a> WalletDiffer<'a> {
    pub fn load(db: &'a Database) -> MonitorResult<Self> {
        let known = db.known_addresses()?;
        logger::debug(
            LogTag::Monitor,
            &format!("Loaded {} known wallet addresses", known.len()),
        );
        Ok(Self { db, known })
    }

    /// Persist and return the candidates whose address is not yet known, in input order
    pub fn diff_and_persist(&mut self, candidates: &[CandidateWallet]) -> MonitorResult<Vec<Wallet>> {
        let mut new_wallets = Vec::new();

        for candidate in candidates {
            if self.known.contains(&candidate.address) {
                continue;
            }

            let wallet = wallet_from_candidate(candidate)?;
            logger::info(
                LogTag::Monitor,
                &format!("New wallet detected: {} ({})", wallet.address, wallet.chain),
            );

            self.db.save_wallet(&wallet)?;
            self.known.insert(wallet.address.clone());
            new_wallets.push(wallet);
        }

        Ok(new_wallets)
    }
}

fn wallet_from_candidate(candidate: &CandidateWallet) -> MonitorResult<Wallet> {
    let first_seen = if candidate.first_seen.is_empty() {
        Utc::now().to_rfc3339()
    } else {
        candidate.first_seen.clone()
    };

    Ok(Wallet {
        address: candidate.address.clone(),
        chain: candidate.chain,
        first_seen,
        first_transaction: candidate.first_transaction.clone(),
        label: candidate.label.clone(),
        balance: Some(candidate.balance),
        raw_data: Some(serde_json::to_string(candidate)?),
    })
}
