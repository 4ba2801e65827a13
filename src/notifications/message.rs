//! Alert text shared by every channel
//!
//! The body uses chat markdown (`**bold**`, `` `code` ``) which Discord and
//! Telegram render directly; email gets an HTML rendition via [`to_html`].

use crate::database::Wallet;
use chrono::Local;
use std::borrow::Cow;

/// One alert covering every wallet found in a cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// Upper-cased entity id, e.g. `USG`
    pub entity: String,
    pub wallet_count: usize,
    pub body: String,
    /// Byte offset in `body` where the first wallet block starts
    header_end: usize,
    /// Byte offset in `body` where each wallet block ends
    block_ends: Vec<usize>,
}

impl Alert {
    /// Build an alert stamped with the current local time
    pub fn now(entity_id: &str, base_url: &str, wallets: &[Wallet]) -> Self {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Self::compose(entity_id, base_url, wallets, &timestamp)
    }

    pub fn compose(entity_id: &str, base_url: &str, wallets: &[Wallet], timestamp: &str) -> Self {
        let entity = entity_id.to_uppercase();
        let base_url = base_url.trim_end_matches('/');

        let mut body = format!("🚨 **NEW {} WALLET ALERT** 🚨\n\n", entity);
        body.push_str(&format!(
            "Detected {} new {} wallet(s) at {}\n\n",
            wallets.len(),
            entity,
            timestamp
        ));
        let header_end = body.len();
        let mut block_ends = Vec::with_capacity(wallets.len());

        for (i, wallet) in wallets.iter().enumerate() {
            body.push_str(&format!("**Wallet #{}**\n", i + 1));
            body.push_str(&format!("• Address: `{}`\n", wallet.address));
            body.push_str(&format!("• Chain: {}\n", wallet.chain));

            if let Some(first_tx) = wallet.first_transaction.as_deref().filter(|t| !t.is_empty()) {
                body.push_str(&format!("• First Transaction: {}\n", first_tx));
            }
            if let Some(label) = wallet.label.as_deref().filter(|l| !l.is_empty()) {
                body.push_str(&format!("• Label: {}\n", label));
            }
            if let Some(balance) = wallet.balance {
                body.push_str(&format!("• Balance: {}\n", balance));
            }

            body.push_str(&format!(
                "• Link: {}/explorer/address/{}\n\n",
                base_url, wallet.address
            ));
            block_ends.push(body.len());
        }

        Self {
            entity,
            wallet_count: wallets.len(),
            body,
            header_end,
            block_ends,
        }
    }

    /// Body limited to `max_chars` characters
    ///
    /// Trailing wallet blocks that do not fit are dropped whole and counted in
    /// a final `+N more wallet(s) not shown` line. Borrowed when nothing was cut.
    pub fn body_within(&self, max_chars: usize) -> Cow<'_, str> {
        if self.body.chars().count() <= max_chars {
            return Cow::Borrowed(&self.body);
        }

        let total = self.block_ends.len();
        let mut end = self.header_end;
        let mut chars = self.body[..end].chars().count();
        let mut kept = 0;

        for &block_end in &self.block_ends {
            let block_chars = self.body[end..block_end].chars().count();
            let footer_chars = more_wallets_line(total - kept - 1).chars().count();
            if chars + block_chars + footer_chars > max_chars {
                break;
            }
            chars += block_chars;
            end = block_end;
            kept += 1;
        }

        let trimmed = format!("{}{}", &self.body[..end], more_wallets_line(total - kept));
        if trimmed.chars().count() > max_chars {
            return Cow::Owned(trimmed.chars().take(max_chars).collect());
        }
        Cow::Owned(trimmed)
    }

    /// Email subject line
    pub fn subject(&self) -> String {
        format!(
            "🚨 NEW {} WALLET ALERT - {} new wallet(s) detected",
            self.entity, self.wallet_count
        )
    }

    pub fn html_body(&self) -> String {
        to_html(&self.body)
    }
}

fn more_wallets_line(count: usize) -> String {
    if count == 0 {
        String::new()
    } else {
        format!("+{} more wallet(s) not shown\n", count)
    }
}

/// Minimal markdown → HTML for the alert body
///
/// Escapes `& < >`, turns newlines into `<br>`, and pairs `**` markers into
/// `<strong>` and backticks into `<code>` in order of appearance. A marker
/// without a partner is left as literal text.
pub fn to_html(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");

    let with_breaks = escaped.replace('\n', "<br>");
    let bold = pair_markers(&with_breaks, "**", "<strong>", "</strong>");
    pair_markers(&bold, "`", "<code>", "</code>")
}

fn pair_markers(text: &str, marker: &str, open: &str, close: &str) -> String {
    let parts: Vec<&str> = text.split(marker).collect();
    // An even number of parts means the last marker has no partner
    let paired = if parts.len() % 2 == 0 {
        parts.len() - 2
    } else {
        parts.len() - 1
    };

    let mut html = String::with_capacity(text.len() + paired * close.len());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            if i <= paired {
                html.push_str(if i % 2 == 1 { open } else { close });
            } else {
                html.push_str(marker);
            }
        }
        html.push_str(part);
    }
    html
}
