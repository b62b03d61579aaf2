//! Selling price, MSRP, and all-in price disambiguation.
//!
//! Every currency amount on the page is classified by the label text around
//! it. The label window for an amount is the text since the previous amount in
//! the same block. For the first amount in an unlabeled block, the previous
//! sibling block counts too when it holds no amount of its own
//! (`<dt>MSRP</dt><dd>$45,000</dd>`). Text after the amount is consulted only
//! when nothing before it names a price kind (`"$45,000 MSRP"`); a label used
//! that way is consumed and does not also label the next amount.

use std::sync::LazyLock;

use regex::Regex;

use super::rules::{Rule, Source};
use crate::page::ParsedPage;
use crate::text::digits_only;

const PRICE_BLOCK_LEN: usize = 200;

/// Amounts with fewer digits are fees or quantities, not vehicle prices.
const MIN_PRICE_DIGITS: usize = 4;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*(\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{1,2})?").expect("valid regex")
});

const EXCLUDED_LABELS: [&str; 9] = [
    "save",
    "saving",
    "discount",
    "rebate",
    "incentive",
    "payment",
    "bi-weekly",
    "per month",
    "/mo",
];
const MSRP_LABELS: [&str; 4] = ["msrp", "manufacturer", "retail", "list price"];
const ALL_IN_LABELS: [&str; 5] = ["all-in", "all in", "total", "out the door", "drive away"];
const SELLING_LABELS: [&str; 5] = [
    "our price",
    "sale price",
    "selling price",
    "internet price",
    "your price",
];

/// Attribute fallbacks used only when no labeled text produced a value.
const PRICE_ATTR_RULES: &[Rule] = &[Rule::new(
    Source::Attr {
        selector: "[data-price]",
        attr: "data-price",
    },
    amount_digits,
)];
const MSRP_ATTR_RULES: &[Rule] = &[Rule::new(
    Source::Attr {
        selector: "[data-msrp]",
        attr: "data-msrp",
    },
    amount_digits,
)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PriceKind {
    Excluded,
    Msrp,
    AllIn,
    Selling,
    Unlabeled,
}

/// The three price fields, digits only, empty when not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Prices {
    pub price: String,
    pub msrp: String,
    pub all_in: String,
}

/// Classifies every currency amount on the page.
///
/// `price` is the first amount labeled as a selling price, otherwise the first
/// unlabeled amount in document order. MSRP and all-in amounts never become
/// `price`, and selling-price amounts never become `msrp`.
pub(crate) fn extract_prices(view: &super::rules::PageView<'_>) -> Prices {
    let mut prices = classify_page(view.page);
    if prices.price.is_empty() {
        prices.price = super::rules::first_match(view, PRICE_ATTR_RULES).unwrap_or_default();
    }
    if prices.msrp.is_empty() {
        prices.msrp = super::rules::first_match(view, MSRP_ATTR_RULES).unwrap_or_default();
    }
    prices
}

fn classify_page(page: &ParsedPage) -> Prices {
    let mut selling: Option<String> = None;
    let mut unlabeled: Option<String> = None;
    let mut prices = Prices::default();

    for block in page.maximal_blocks(PRICE_BLOCK_LEN) {
        if !block.text.contains('$') {
            continue;
        }
        for (kind, amount) in classify_block(&block.text, &block.preceding) {
            let slot = match kind {
                PriceKind::Excluded => continue,
                PriceKind::Msrp => &mut prices.msrp,
                PriceKind::AllIn => &mut prices.all_in,
                PriceKind::Selling => selling.get_or_insert_with(String::new),
                PriceKind::Unlabeled => unlabeled.get_or_insert_with(String::new),
            };
            if slot.is_empty() {
                *slot = amount;
            }
        }
    }

    prices.price = selling.or(unlabeled).unwrap_or_default();
    prices
}

/// Returns `(kind, digits)` for every plausible amount in `text`.
fn classify_block(text: &str, preceding: &str) -> Vec<(PriceKind, String)> {
    let matches: Vec<_> = AMOUNT_RE.captures_iter(text).collect();
    let mut out = Vec::with_capacity(matches.len());
    let mut window_start = 0;

    for (i, caps) in matches.iter().enumerate() {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let mut leading = text[window_start..whole.start()].to_lowercase();
        if i == 0 && label_kind(&leading).is_none() && !preceding.contains('$') {
            leading = format!("{} {leading}", preceding.to_lowercase());
        }
        let trailing_end = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |next| next.start());
        window_start = whole.end();

        let digits = digits_only(number.as_str());
        if digits.len() < MIN_PRICE_DIGITS {
            continue;
        }

        let kind = match label_kind(&leading) {
            Some(kind) => kind,
            None => match label_kind(&text[whole.end()..trailing_end].to_lowercase()) {
                Some(kind) => {
                    // A trailing label belongs to this amount only.
                    window_start = trailing_end;
                    kind
                }
                None => PriceKind::Unlabeled,
            },
        };
        out.push((kind, digits));
    }
    out
}

/// The price kind a lowercase label window names, checked most specific first.
fn label_kind(window: &str) -> Option<PriceKind> {
    let has = |labels: &[&str]| labels.iter().any(|label| window.contains(label));
    if has(&EXCLUDED_LABELS) {
        Some(PriceKind::Excluded)
    } else if has(&MSRP_LABELS) {
        Some(PriceKind::Msrp)
    } else if has(&ALL_IN_LABELS) {
        Some(PriceKind::AllIn)
    } else if has(&SELLING_LABELS) {
        Some(PriceKind::Selling)
    } else {
        None
    }
}

/// Digits of a price-like attribute value (`"39999.00"` becomes `"39999"`).
fn amount_digits(raw: &str) -> Option<String> {
    let whole = raw.split('.').next().unwrap_or_default();
    let digits = digits_only(whole);
    (digits.len() >= MIN_PRICE_DIGITS).then_some(digits)
}

#[cfg(test)]
#[path = "price_test.rs"]
mod tests;
