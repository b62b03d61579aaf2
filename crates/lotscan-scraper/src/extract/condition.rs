//! New/used condition from the URL, then badges, then mileage.

use std::sync::LazyLock;

use lotscan_core::Condition;
use regex::Regex;
use reqwest::Url;

use crate::page::{in_site_chrome, visible_text, ParsedPage};

const BADGE_SELECTORS: &str = "[class*=\"badge\"], [class*=\"condition\"], [class*=\"ribbon\"], \
     [class*=\"tag\"], [class*=\"label\"], [class*=\"status\"]";

/// Badges longer than this are prose, not a condition label.
const MAX_BADGE_LEN: usize = 60;

static USED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bused\b|\bpre-?owned\b|\bpreowned\b").expect("valid regex")
});
static NEW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^new$|\bnew vehicle\b|\bbrand new\b").expect("valid regex"));

/// Condition named by a path segment: `new`, `new-*`, `used`, `used-*`, or
/// `pre-owned`. The first segment that names one wins.
pub(crate) fn condition_from_url(url: &str) -> Option<Condition> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .map(str::to_ascii_lowercase)
        .find_map(|segment| {
            if segment == "new" || segment.starts_with("new-") {
                Some(Condition::New)
            } else if segment == "used"
                || segment.starts_with("used-")
                || segment == "pre-owned"
                || segment.starts_with("pre-owned-")
            {
                Some(Condition::Used)
            } else {
                None
            }
        })
}

/// Condition printed on a badge-like element outside the site menus.
pub(crate) fn condition_from_badges(page: &ParsedPage) -> Option<Condition> {
    page.select(BADGE_SELECTORS)
        .into_iter()
        .filter(|el| !in_site_chrome(*el))
        .map(visible_text)
        .filter(|text| !text.is_empty() && text.chars().count() <= MAX_BADGE_LEN)
        .find_map(|text| {
            if USED_RE.is_match(&text) {
                Some(Condition::Used)
            } else if NEW_RE.is_match(&text) {
                Some(Condition::New)
            } else {
                None
            }
        })
}

/// Best-effort fallback: a vehicle with kilometres on it is treated as used.
/// Applied only when neither the URL nor a badge decided.
pub(crate) fn condition_from_mileage(mileage: &str) -> Option<Condition> {
    mileage
        .parse::<u64>()
        .ok()
        .filter(|km| *km > 0)
        .map(|_| Condition::Used)
}
