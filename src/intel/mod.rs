//! Intelligence site access: fetch an entity page and pull wallets out of it

mod client;
mod extractor;
mod source;
mod types;

pub use client::{IntelClient, BROWSER_USER_AGENT};
pub use extractor::{
    AddressLinkStrategy, EmbeddedScriptStrategy, ExtractionStrategy, PageWallet, WalletExtractor,
};
pub use source::{IntelSource, WalletSource};
pub use types::{CandidateWallet, EntityReport, SnapshotQuery};
