use super::{ExtractionStrategy, PageWallet};
use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>(.*?)</script>").expect("Invalid script regex")
});

static ADDRESS_FIELD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""address":"([^"]+)""#).expect("Invalid address field regex"));

/// `"address":"..."` fields inside inline scripts that mention `wallets`
///
/// Only the address is recovered, so chain and balance stay at their defaults.
pub struct EmbeddedScriptStrategy;

impl ExtractionStrategy for EmbeddedScriptStrategy {
    fn name(&self) -> &'static str {
        "embedded-scripts"
    }

    fn extract(&self, page: &str) -> Vec<PageWallet> {
        SCRIPT_PATTERN
            .captures_iter(page)
            .filter_map(|caps| caps.get(1))
            .map(|body| body.as_str())
            .filter(|body| body.contains("wallets"))
            .flat_map(|body| ADDRESS_FIELD_PATTERN.captures_iter(body))
            .map(|caps| PageWallet::bare(&caps[1]))
            .collect()
    }
}
