use super::{ExtractionStrategy, PageWallet};
use crate::database::Chain;
use once_cell::sync::Lazy;
use regex::Regex;

const ADDRESS_PATH: &str = "/explorer/address/";

static ANCHOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']*/explorer/address/[^"']*)["']"#)
        .expect("Invalid anchor regex")
});

static DIV_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(/?)div\b([^>]*)>").expect("Invalid div regex"));

static CLASS_ATTR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\bclass\s*=\s*["']([^"']*)["']"#).expect("Invalid class regex")
});

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("Invalid tag regex"));

static CHAIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(ETH|BTC|USDT|SOL)\b").expect("Invalid chain regex"));

static BALANCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([\d,.]+)").expect("Invalid balance regex"));

/// Anchors pointing at `/explorer/address/{address}`
///
/// Chain and balance come from the text of the closest enclosing
/// `<div class="...card...">`; anchors outside a card keep the defaults.
pub struct AddressLinkStrategy;

impl ExtractionStrategy for AddressLinkStrategy {
    fn name(&self) -> &'static str {
        "address-links"
    }

    fn extract(&self, page: &str) -> Vec<PageWallet> {
        let anchors = find_anchors(page);
        if anchors.is_empty() {
            return Vec::new();
        }

        let layout = CardLayout::scan(page, &anchors);
        let mut details: Vec<Option<(Chain, f64)>> = vec![None; layout.cards.len()];

        anchors
            .iter()
            .zip(&layout.owners)
            .map(|(anchor, owner)| {
                let mut wallet = PageWallet::bare(anchor.address);
                if let Some(card) = *owner {
                    let (chain, balance) = *details[card]
                        .get_or_insert_with(|| card_details(layout.cards[card].slice(page)));
                    wallet.chain = chain;
                    wallet.balance = balance;
                }
                wallet
            })
            .collect()
    }
}

struct Anchor<'a> {
    start: usize,
    address: &'a str,
}

fn find_anchors(page: &str) -> Vec<Anchor<'_>> {
    ANCHOR_PATTERN
        .captures_iter(page)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let address = caps
                .get(1)?
                .as_str()
                .rsplit(ADDRESS_PATH)
                .next()
                .unwrap_or_default()
                .trim();
            (!address.is_empty()).then_some(Anchor { start, address })
        })
        .collect()
}

/// Byte range of a card div, opening tag through its closing tag
#[derive(Debug, Clone, Copy, PartialEq)]
struct Card {
    start: usize,
    end: usize,
}

impl Card {
    fn slice<'a>(&self, page: &'a str) -> &'a str {
        &page[self.start..self.end]
    }
}

/// Card divs of a page and the innermost card enclosing each anchor
struct CardLayout {
    cards: Vec<Card>,
    /// Parallel to the anchors passed to `scan`
    owners: Vec<Option<usize>>,
}

struct OpenDiv {
    /// Index into `cards` when this div is itself a card
    card: Option<usize>,
    /// Innermost card open at this depth, this div included
    innermost: Option<usize>,
}

impl CardLayout {
    /// One pass over the div tags; anchors must be in page order
    fn scan(page: &str, anchors: &[Anchor<'_>]) -> Self {
        let mut cards: Vec<Card> = Vec::new();
        let mut owners = Vec::with_capacity(anchors.len());
        let mut open: Vec<OpenDiv> = Vec::new();
        let mut pending = anchors.iter().peekable();

        for tag in DIV_TAG_PATTERN.captures_iter(page) {
            let Some(whole) = tag.get(0) else { continue };

            while pending.next_if(|a| a.start < whole.start()).is_some() {
                owners.push(open.last().and_then(|div| div.innermost));
            }

            if &tag[1] == "/" {
                if let Some(OpenDiv { card: Some(card), .. }) = open.pop() {
                    cards[card].end = whole.end();
                }
            } else if is_card(&tag[2]) {
                cards.push(Card {
                    start: whole.start(),
                    // Unclosed card runs to the end of the page
                    end: page.len(),
                });
                let card = cards.len() - 1;
                open.push(OpenDiv {
                    card: Some(card),
                    innermost: Some(card),
                });
            } else {
                let innermost = open.last().and_then(|div| div.innermost);
                open.push(OpenDiv {
                    card: None,
                    innermost,
                });
            }
        }

        for _ in pending {
            owners.push(open.last().and_then(|div| div.innermost));
        }

        Self { cards, owners }
    }
}

/// `class` attribute contains `card` (case-sensitive)
fn is_card(attributes: &str) -> bool {
    CLASS_ATTR_PATTERN
        .captures(attributes)
        .map(|caps| caps[1].contains("card"))
        .unwrap_or(false)
}

fn card_details(markup: &str) -> (Chain, f64) {
    let texts = text_nodes(markup);
    (chain_from_texts(&texts), balance_from_texts(&texts))
}

fn text_nodes(markup: &str) -> Vec<&str> {
    TAG_PATTERN
        .split(markup)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect()
}

fn chain_from_texts(texts: &[&str]) -> Chain {
    texts
        .iter()
        .find_map(|text| CHAIN_PATTERN.captures(text))
        .map(|caps| Chain::from_ticker(&caps[1]))
        .unwrap_or_default()
}

fn balance_from_texts(texts: &[&str]) -> f64 {
    texts
        .iter()
        .find_map(|text| BALANCE_PATTERN.captures(text))
        .map(|caps| parse_amount(&caps[1]))
        .unwrap_or(0.0)
}

/// `1,234.56` → 1234.56; anything unparseable is 0
fn parse_amount(raw: &str) -> f64 {
    raw.replace(',', "").parse::<f64>().unwrap_or(0.0)
}
