//! Link Collector: detail-page URLs referenced by inventory listing pages.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::client::resolve_url;
use crate::page::ParsedPage;

/// Path fragments that mark an href as pointing into the inventory.
const INVENTORY_MARKERS: [&str; 3] = ["/inventory/", "/vehicles/", "/vdp/"];

/// Category pages that list vehicles rather than describe one.
const CATEGORY_PATHS: [&str; 5] = [
    "/inventory",
    "/inventory/new",
    "/inventory/used",
    "/vehicles",
    "/vdp",
];

/// Query keys that turn a listing URL into a pagination/sort/filter variant.
const LISTING_QUERY_KEYS: [&str; 3] = ["page", "sort", "filter"];

/// Year-slug paths such as `/2024-toyota-camry-le`.
static YEAR_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:19|20)\d{2}-[A-Za-z0-9-]+").expect("valid regex"));

/// Returns the absolute detail-page URLs referenced by one listing page.
///
/// Relative hrefs are resolved against `site_base`. An empty result is not
/// an error; it is logged for diagnostics.
#[must_use]
pub fn extract_detail_links(page: &ParsedPage, site_base: &Url) -> BTreeSet<String> {
    let links: BTreeSet<String> = page
        .hrefs()
        .filter(|href| is_inventory_href(href))
        .filter_map(|href| resolve_url(site_base, href))
        .filter(|url| !is_listing_url(url))
        .map(String::from)
        .collect();

    if links.is_empty() {
        tracing::info!(url = page.url(), "no detail links found on listing page");
    } else {
        tracing::debug!(url = page.url(), count = links.len(), "collected detail links");
    }
    links
}

/// Union of the detail links found across all `pages`.
#[must_use]
pub fn collect_detail_links(pages: &[ParsedPage], site_base: &Url) -> BTreeSet<String> {
    pages
        .iter()
        .flat_map(|page| extract_detail_links(page, site_base))
        .collect()
}

fn is_inventory_href(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    INVENTORY_MARKERS.iter().any(|marker| lower.contains(marker))
        || YEAR_SLUG_RE.is_match(&lower)
}

/// A category or pagination URL: its path is (or ends with) a bare category
/// path, or its query carries a page/sort/filter key.
fn is_listing_url(url: &Url) -> bool {
    let path = url.path().trim_end_matches('/').to_ascii_lowercase();
    if path.is_empty() || CATEGORY_PATHS.iter().any(|category| path.ends_with(category)) {
        return true;
    }
    url.query_pairs().any(|(key, _)| {
        LISTING_QUERY_KEYS
            .iter()
            .any(|listing_key| key.eq_ignore_ascii_case(listing_key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://dealer.example").unwrap()
    }

    fn listing(url: &str, hrefs: &[&str]) -> ParsedPage {
        let anchors: String = hrefs
            .iter()
            .map(|href| format!(r#"<a href="{href}">link</a>"#))
            .collect();
        ParsedPage::parse(url, &format!("<html><body>{anchors}</body></html>"))
    }

    #[test]
    fn category_and_pagination_links_are_excluded() {
        let page = listing(
            "https://dealer.example/inventory/new/",
            &[
                "/inventory/new/",
                "/inventory/new/?page=2",
                "/inventory/2024-camry-le",
            ],
        );
        let links = extract_detail_links(&page, &base());
        assert_eq!(
            links.into_iter().collect::<Vec<_>>(),
            vec!["https://dealer.example/inventory/2024-camry-le"]
        );
    }

    #[test]
    fn sort_and_filter_queries_are_excluded() {
        let page = listing(
            "https://dealer.example/inventory/used/",
            &[
                "/inventory/used/?sort=price",
                "/inventory/used/?filter=suv",
                "/inventory/used/2019-rav4-xle?page_size=10",
            ],
        );
        let links = extract_detail_links(&page, &base());
        assert_eq!(
            links.into_iter().collect::<Vec<_>>(),
            vec!["https://dealer.example/inventory/used/2019-rav4-xle?page_size=10"]
        );
    }

    #[test]
    fn non_inventory_links_are_ignored() {
        let page = listing(
            "https://dealer.example/inventory/new/",
            &["/about-us", "/service/", "tel:4035550100", "/vdp/88213"],
        );
        let links = extract_detail_links(&page, &base());
        assert_eq!(
            links.into_iter().collect::<Vec<_>>(),
            vec!["https://dealer.example/vdp/88213"]
        );
    }

    #[test]
    fn year_slug_paths_count_as_detail_links() {
        let page = listing(
            "https://dealer.example/inventory/new/",
            &["/2023-toyota-tacoma-trd-sport-4x4/"],
        );
        let links = extract_detail_links(&page, &base());
        assert!(links.contains("https://dealer.example/2023-toyota-tacoma-trd-sport-4x4/"));
    }

    #[test]
    fn absolute_and_relative_duplicates_collapse() {
        let page = listing(
            "https://dealer.example/inventory/new/",
            &[
                "/inventory/2024-camry-le",
                "https://dealer.example/inventory/2024-camry-le",
                "/inventory/2024-camry-le#photos",
            ],
        );
        assert_eq!(extract_detail_links(&page, &base()).len(), 1);
    }

    #[test]
    fn overlapping_pages_union_to_distinct_links() {
        let first = listing(
            "https://dealer.example/inventory/new/",
            &[
                "/inventory/2024-camry-le",
                "/inventory/2024-rav4-xle",
                "/inventory/2024-tacoma-sr5",
            ],
        );
        let second = listing(
            "https://dealer.example/inventory/new/?page=2",
            &["/inventory/2024-tacoma-sr5", "/inventory/2024-sienna-xse"],
        );
        let links = collect_detail_links(&[first, second], &base());
        assert_eq!(links.len(), 4);
    }
}
