use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Listen address for the HTTP scrape trigger.
    pub bind_addr: SocketAddr,
    /// Scheme + host of the dealership site, e.g. `https://www.reddeertoyota.com`.
    pub site_base_url: String,
    /// Inventory listing pages scanned for detail links, in fetch order.
    pub listing_urls: Vec<String>,
    pub vocabulary_path: Option<PathBuf>,
    pub feed_label: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub inter_request_delay_ms: u64,
    pub worksheet_title: String,
    /// Service-account JSON blob for the spreadsheet sink.
    pub google_credentials: Option<String>,
    pub google_sheet_id: Option<String>,
}

impl AppConfig {
    /// Returns the credential blob and sheet ID when both are configured.
    #[must_use]
    pub fn sheet_credentials(&self) -> Option<(&str, &str)> {
        match (&self.google_credentials, &self.google_sheet_id) {
            (Some(creds), Some(sheet_id)) if !creds.is_empty() && !sheet_id.is_empty() => {
                Some((creds.as_str(), sheet_id.as_str()))
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("bind_addr", &self.bind_addr)
            .field("site_base_url", &self.site_base_url)
            .field("listing_urls", &self.listing_urls)
            .field("vocabulary_path", &self.vocabulary_path)
            .field("feed_label", &self.feed_label)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("worksheet_title", &self.worksheet_title)
            .field(
                "google_credentials",
                &self.google_credentials.as_ref().map(|_| "[redacted]"),
            )
            .field("google_sheet_id", &self.google_sheet_id)
            .finish()
    }
}
