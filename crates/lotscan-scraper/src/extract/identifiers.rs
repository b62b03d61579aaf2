//! Stock number and VIN.

use std::sync::LazyLock;

use regex::Regex;

use super::rules::{Rule, Source, MAX_BLOCK_LEN};

/// Shortest token accepted after a lone `#` (`"Call #1 dealer"` is not a stock number).
const MIN_HASH_STOCK_LEN: usize = 2;

static STOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:(?P<word>\b(?:stock|stk)\b(?:\s*(?:number|num|no\.?))?)|#)[\s#:.\-]*(?P<value>[a-z0-9][a-z0-9\-]*)",
    )
    .expect("valid regex")
});

static LABELED_VIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bvin\b(?:\s*(?:number|no\.?|#))?[\s:#.\-]*([A-HJ-NPR-Z0-9]{17})\b")
        .expect("valid regex")
});

static BARE_VIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-HJ-NPR-Z0-9]{17}\b").expect("valid regex"));

pub(crate) const STOCK_RULES: &[Rule] = &[
    Rule::new(
        Source::Attr {
            selector: "[data-stock]",
            attr: "data-stock",
        },
        bare_stock,
    ),
    Rule::new(Source::Selector(".stock-number"), stock_or_bare),
    Rule::new(Source::Selector("[class*=\"stock\"]"), labeled_stock),
    Rule::new(
        Source::Keyword {
            keyword: "stock",
            max_len: MAX_BLOCK_LEN,
        },
        labeled_stock,
    ),
    Rule::new(
        Source::Keyword {
            keyword: "stk",
            max_len: MAX_BLOCK_LEN,
        },
        labeled_stock,
    ),
];

/// Labeled matches anywhere on the page are tried before any bare
/// 17-character token.
pub(crate) const VIN_RULES: &[Rule] = &[
    Rule::new(
        Source::Attr {
            selector: "[data-vin]",
            attr: "data-vin",
        },
        normalize_vin,
    ),
    Rule::new(
        Source::Keyword {
            keyword: "vin",
            max_len: MAX_BLOCK_LEN,
        },
        labeled_vin,
    ),
    Rule::new(Source::PageText, labeled_vin),
    Rule::new(Source::Selector(".vin"), bare_vin),
    Rule::new(Source::PageText, bare_vin),
];

/// Token following a `Stock`/`Stk`/`#` label; it must contain a digit, and
/// after a lone `#` it must be at least two characters long.
/// A rejected token may itself be the next label (`In Stock Stock: N1`), so
/// the scan resumes at the rejected token rather than after it.
pub(crate) fn labeled_stock(text: &str) -> Option<String> {
    let mut from = 0;
    while let Some(caps) = STOCK_RE.captures_at(text, from) {
        let token = caps.name("value")?;
        let value = token.as_str().trim_end_matches('-');
        let long_enough = caps.name("word").is_some() || value.len() >= MIN_HASH_STOCK_LEN;
        if long_enough && value.chars().any(|c| c.is_ascii_digit()) {
            return Some(value.to_owned());
        }
        from = token.start();
    }
    None
}

/// A whole value that is itself a stock number (`"T1234"`, `"24-0193A"`).
fn bare_stock(text: &str) -> Option<String> {
    let token = text.trim();
    let valid = !token.is_empty()
        && !token.contains(char::is_whitespace)
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && token.chars().any(|c| c.is_ascii_digit());
    valid.then(|| token.to_owned())
}

fn stock_or_bare(text: &str) -> Option<String> {
    labeled_stock(text).or_else(|| bare_stock(text))
}

/// Uppercases `raw` and accepts it when it is exactly one VIN.
pub(crate) fn normalize_vin(raw: &str) -> Option<String> {
    let vin = raw.trim().to_ascii_uppercase();
    (vin.len() == 17 && BARE_VIN_RE.is_match(&vin) && has_digit_and_letter(&vin)).then_some(vin)
}

/// 17-character VIN following a `VIN` label, any case, uppercased.
pub(crate) fn labeled_vin(text: &str) -> Option<String> {
    LABELED_VIN_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| normalize_vin(m.as_str()))
}

/// Unlabeled uppercase 17-character token with at least one digit and one
/// letter, so long numbers and shouted words are not mistaken for VINs.
pub(crate) fn bare_vin(text: &str) -> Option<String> {
    BARE_VIN_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|candidate| has_digit_and_letter(candidate))
        .map(str::to_owned)
}

fn has_digit_and_letter(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit()) && value.chars().any(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::rules::{first_match, PageView};
    use crate::page::ParsedPage;

    #[test]
    fn labeled_stock_reads_common_label_shapes() {
        assert_eq!(labeled_stock("Stock #: T1234").as_deref(), Some("T1234"));
        assert_eq!(labeled_stock("Stock Number 24-0193A").as_deref(), Some("24-0193A"));
        assert_eq!(labeled_stock("Stk# P4567").as_deref(), Some("P4567"));
        assert_eq!(labeled_stock("stock no. u8812").as_deref(), Some("u8812"));
    }

    #[test]
    fn labeled_stock_skips_tokens_without_digits() {
        assert_eq!(labeled_stock("In Stock Stock: N24117").as_deref(), Some("N24117"));
        assert!(labeled_stock("Stock Photo").is_none());
    }

    #[test]
    fn single_character_after_hash_is_not_a_stock_number() {
        assert!(labeled_stock("In stock! Call #1 dealer").is_none());
        assert_eq!(labeled_stock("# 24A").as_deref(), Some("24A"));
        assert_eq!(labeled_stock("Stock: 7").as_deref(), Some("7"));
    }

    #[test]
    fn status_badge_does_not_shadow_labeled_stock_number() {
        let page = ParsedPage::parse(
            "https://dealer.example/inventory/2024-camry-le",
            "<html><body><div class='stock-status'>In stock! Call #1 dealer</div>\
             <p>Stock: T9999</p></body></html>",
        );
        let stock = first_match(&PageView::new(&page), STOCK_RULES);
        assert_eq!(stock.as_deref(), Some("T9999"));
    }

    #[test]
    fn bare_stock_rejects_sentences() {
        assert_eq!(bare_stock(" T1234 ").as_deref(), Some("T1234"));
        assert!(bare_stock("call 555 1234").is_none());
        assert!(bare_stock("ABC").is_none());
    }

    #[test]
    fn labeled_vin_is_uppercased() {
        assert_eq!(
            labeled_vin("VIN: 1hgcm82633a123456").as_deref(),
            Some("1HGCM82633A123456")
        );
        assert_eq!(
            labeled_vin("Vin # 1HGCM82633A123456 Stock: T1").as_deref(),
            Some("1HGCM82633A123456")
        );
    }

    #[test]
    fn vin_alphabet_excludes_i_o_q() {
        assert!(labeled_vin("VIN: 1HGCM82633I123456").is_none());
        assert!(normalize_vin("1HGCM82633O123456").is_none());
        assert!(bare_vin("1HGCM82633Q123456").is_none());
    }

    #[test]
    fn bare_vin_needs_digit_and_letter() {
        assert!(bare_vin("12345678901234567").is_none());
        assert!(bare_vin("ABCDEFGHJKLMNPRST").is_none());
        assert_eq!(
            bare_vin("stock photo of 4T1G11AK5RU123456 shown").as_deref(),
            Some("4T1G11AK5RU123456")
        );
    }

    #[test]
    fn normalize_vin_rejects_wrong_length() {
        assert!(normalize_vin("1HGCM82633A12345").is_none());
        assert!(normalize_vin("1HGCM82633A1234567").is_none());
        assert_eq!(
            normalize_vin(" 1hgcm82633a123456 ").as_deref(),
            Some("1HGCM82633A123456")
        );
    }
}
