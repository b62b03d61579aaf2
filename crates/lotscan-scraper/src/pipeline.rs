//! Sequential scrape run: listing pages, then detail pages, one at a time.

use std::collections::BTreeSet;

use lotscan_core::{AppConfig, VehicleRecord, Vocabulary};
use reqwest::Url;

use crate::client::{site_origin, PageClient, RequestProfile};
use crate::error::ScraperError;
use crate::extract::RecordExtractor;
use crate::links::extract_detail_links;
use crate::page::ParsedPage;

/// Drives the Link Collector and Record Extractor over a dealer site.
///
/// Requests are strictly sequential with the profile's politeness delay after
/// every fetch attempt. A failed page is logged and skipped; it never aborts
/// the run.
pub struct InventoryScraper {
    client: PageClient,
    extractor: RecordExtractor,
    site_base: Url,
}

impl InventoryScraper {
    /// Relative hrefs on listing pages resolve against the origin of
    /// `site_base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `site_base_url` does not parse.
    pub fn new(
        client: PageClient,
        extractor: RecordExtractor,
        site_base_url: &str,
    ) -> Result<Self, ScraperError> {
        let site_base =
            Url::parse(&site_origin(site_base_url)).map_err(|e| ScraperError::InvalidUrl {
                url: site_base_url.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            extractor,
            site_base,
        })
    }

    /// Builds the client and extractor from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if the HTTP client cannot be built or the site
    /// base URL is invalid.
    pub fn from_config(config: &AppConfig, vocabulary: Vocabulary) -> Result<Self, ScraperError> {
        let client = PageClient::new(RequestProfile::from_config(config))?;
        let extractor = RecordExtractor::new(vocabulary, config.feed_label.as_str());
        Self::new(client, extractor, &config.site_base_url)
    }

    /// Fetches each listing page and returns the union of their detail links.
    pub async fn collect_links(&self, listing_urls: &[String]) -> BTreeSet<String> {
        let mut links = BTreeSet::new();
        tracing::debug!(
            pages = listing_urls.len(),
            delay_ms = self.client.profile().inter_request_delay_ms,
            "collecting detail links"
        );
        for url in listing_urls {
            tracing::info!(url = url.as_str(), "scanning listing page");
            match self.client.fetch_page(url).await {
                Ok(body) => {
                    let found = self.links_from_body(url, &body);
                    tracing::info!(url = url.as_str(), count = found.len(), "listing page scanned");
                    links.extend(found);
                }
                Err(e) => {
                    tracing::warn!(url = url.as_str(), error = %e, "listing page fetch failed");
                }
            }
            self.client.pause().await;
        }
        tracing::info!(total = links.len(), "unique detail pages found");
        links
    }

    /// Scrapes each detail page in sorted URL order.
    pub async fn scrape_details(&self, links: &BTreeSet<String>) -> Vec<VehicleRecord> {
        let total = links.len();
        let mut records = Vec::with_capacity(total);
        for (i, url) in links.iter().enumerate() {
            tracing::info!(url = url.as_str(), "Progress: {}/{}", i + 1, total);
            match self.scrape_detail(url).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(url = url.as_str(), error = %e, "detail page fetch failed; skipping");
                }
            }
            self.client.pause().await;
        }
        records
    }

    /// Fetches and extracts one detail page.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] if the page cannot be fetched.
    pub async fn scrape_detail(&self, url: &str) -> Result<VehicleRecord, ScraperError> {
        let body = self.client.fetch_page(url).await?;
        Ok(self.record_from_body(url, &body))
    }

    /// Collects links from `listing_urls`, then scrapes every detail page.
    pub async fn scrape_inventory(&self, listing_urls: &[String]) -> Vec<VehicleRecord> {
        let links = self.collect_links(listing_urls).await;
        let records = self.scrape_details(&links).await;
        tracing::info!(
            links = links.len(),
            records = records.len(),
            "inventory scrape complete"
        );
        records
    }

    // Parsing stays in sync helpers so no `Html` lives across an await.
    fn links_from_body(&self, url: &str, body: &str) -> BTreeSet<String> {
        let page = ParsedPage::parse(url, body);
        extract_detail_links(&page, &self.site_base)
    }

    fn record_from_body(&self, url: &str, body: &str) -> VehicleRecord {
        let page = ParsedPage::parse(url, body);
        self.extractor.extract(&page)
    }
}
