//! Description, option list, certified pre-owned flag, and primary image.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;
use scraper::ElementRef;

use crate::client::resolve_url;
use crate::page::{in_site_chrome, visible_text, ParsedPage};
use crate::text::within_len;

const DESCRIPTION_SELECTORS: &str = "[itemprop=\"description\"], \
     [class*=\"description\"], [id*=\"description\"], \
     [class*=\"comments\"], [id*=\"comments\"], \
     [class*=\"notes\"], [id*=\"notes\"], \
     [class*=\"overview\"], [id*=\"overview\"]";
const DESCRIPTION_MIN_LEN: usize = 50;
const DESCRIPTION_MAX_LEN: usize = 3000;

const OPTION_KEYWORDS: [&str; 5] = ["feature", "option", "equipment", "package", "highlight"];
const MAX_OPTION_LEN: usize = 150;
const MAX_OPTIONS: usize = 50;
/// Headings longer than this are body copy, not a section title.
const MAX_HEADING_LEN: usize = 80;

const IMAGE_SELECTORS: [&str; 7] = [
    "img.vehicle-image",
    ".gallery img",
    ".vdp-image img",
    "[class*=\"gallery\"] img",
    "[class*=\"carousel\"] img",
    "[class*=\"slider\"] img",
    "[class*=\"photo\"] img",
];
const IMAGE_SOURCE_ATTRS: [&str; 4] = ["src", "data-src", "data-lazy-src", "data-original"];
const IMAGE_DENYLIST: [&str; 8] = [
    "logo",
    "icon",
    "button",
    "badge",
    "sprite",
    "placeholder",
    "spinner",
    "loading",
];

static CPO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)certified\s+pre-?owned|certified\s+preowned|\bcpo\b").expect("valid regex")
});

/// First description-like container with a plausible amount of text.
pub(crate) fn extract_description(page: &ParsedPage) -> Option<String> {
    page.select(DESCRIPTION_SELECTORS)
        .into_iter()
        .filter(|el| !in_site_chrome(*el))
        .map(visible_text)
        .find(|text| within_len(text, DESCRIPTION_MIN_LEN, DESCRIPTION_MAX_LEN))
}

/// Items of every feature-like list, deduplicated, joined with `"; "`.
pub(crate) fn extract_options(page: &ParsedPage) -> Option<String> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for list in page.select("ul, ol") {
        if in_site_chrome(list) || !is_feature_list(list) {
            continue;
        }
        for item in list.children().filter_map(ElementRef::wrap) {
            if item.value().name() != "li" {
                continue;
            }
            let text = visible_text(item);
            if text.is_empty() || text.chars().count() > MAX_OPTION_LEN {
                continue;
            }
            if seen.insert(text.to_lowercase()) {
                items.push(text);
            }
            if items.len() == MAX_OPTIONS {
                return Some(items.join("; "));
            }
        }
    }

    (!items.is_empty()).then(|| items.join("; "))
}

/// A list is a feature list when it, its container, or the heading right
/// before it mentions features, options, equipment, packages, or highlights.
fn is_feature_list(list: ElementRef<'_>) -> bool {
    if names_feature_section(list) {
        return true;
    }
    if list
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(names_feature_section)
    {
        return true;
    }
    list.prev_siblings()
        .filter_map(ElementRef::wrap)
        .next()
        .map(visible_text)
        .is_some_and(|heading| {
            heading.chars().count() <= MAX_HEADING_LEN && mentions_feature(&heading)
        })
}

fn names_feature_section(el: ElementRef<'_>) -> bool {
    let value = el.value();
    [value.attr("class"), value.id()]
        .into_iter()
        .flatten()
        .any(mentions_feature)
}

fn mentions_feature(text: &str) -> bool {
    let lower = text.to_lowercase();
    OPTION_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// `"yes"` when the page body (menus excluded) advertises CPO status.
pub(crate) fn extract_certified(page: &ParsedPage) -> Option<String> {
    CPO_RE
        .is_match(&page.content_text())
        .then(|| "yes".to_owned())
}

/// First usable vehicle photo as an absolute URL: gallery images first, then
/// any image, skipping logos, icons, placeholders, and inline `data:` images.
pub(crate) fn extract_image(page: &ParsedPage) -> Option<String> {
    let base = Url::parse(page.url()).ok()?;
    IMAGE_SELECTORS
        .iter()
        .flat_map(|selector| page.select(selector))
        .chain(page.images())
        .filter(|img| !in_site_chrome(*img))
        .find_map(|img| image_source(img, &base))
}

fn image_source(img: ElementRef<'_>, base: &Url) -> Option<String> {
    let value = img.value();
    let class_and_alt = format!(
        "{} {}",
        value.attr("class").unwrap_or_default(),
        value.attr("alt").unwrap_or_default()
    )
    .to_lowercase();
    if class_and_alt.contains("logo") {
        return None;
    }
    IMAGE_SOURCE_ATTRS
        .iter()
        .filter_map(|attr| value.attr(attr))
        .map(str::trim)
        .filter(|src| !src.is_empty() && !src.starts_with("data:"))
        .find(|src| {
            let lower = src.to_lowercase();
            !IMAGE_DENYLIST.iter().any(|deny| lower.contains(deny))
        })
        .and_then(|src| resolve_url(base, src))
        .map(String::from)
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
