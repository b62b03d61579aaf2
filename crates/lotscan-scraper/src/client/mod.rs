//! Page fetch collaborator: one GET per URL, no retries.

mod origin;

use std::time::Duration;

use lotscan_core::{AppConfig, DEFAULT_USER_AGENT};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use reqwest::Client;

use crate::error::ScraperError;

pub use origin::{resolve_url, site_origin};

/// Request settings shared by every fetch in a run.
///
/// Built once and handed to [`PageClient::new`]; the client never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestProfile {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub timeout_secs: u64,
    /// Politeness delay inserted after each fetch attempt.
    pub inter_request_delay_ms: u64,
}

impl Default for RequestProfile {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_owned(),
            accept_language: "en-US,en;q=0.9".to_owned(),
            timeout_secs: 30,
            inter_request_delay_ms: 1000,
        }
    }
}

impl RequestProfile {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout_secs: config.request_timeout_secs,
            inter_request_delay_ms: config.inter_request_delay_ms,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.inter_request_delay_ms)
    }
}

/// HTTP client that returns the body of an HTML page.
///
/// 404 and other non-2xx responses become typed errors. Each call makes exactly
/// one attempt bounded by the profile's timeout.
pub struct PageClient {
    client: Client,
    profile: RequestProfile,
}

impl PageClient {
    /// Creates a `PageClient` whose default headers come from `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidHeader`] if a header
    /// value in the profile cannot be sent.
    pub fn new(profile: RequestProfile) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value(&profile.accept)?);
        headers.insert(ACCEPT_LANGUAGE, header_value(&profile.accept_language)?);
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .timeout(Duration::from_secs(profile.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(profile.user_agent.as_str())
            .default_headers(headers)
            .build()?;
        Ok(Self { client, profile })
    }

    #[must_use]
    pub fn profile(&self) -> &RequestProfile {
        &self.profile
    }

    /// Fetches `url` and returns the response body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` does not parse.
    /// - [`ScraperError::NotFound`] on HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Http`] on network, timeout, or body-read failure.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }

    /// Sleeps for the profile's inter-request delay.
    pub async fn pause(&self) {
        let delay = self.profile.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ScraperError> {
    HeaderValue::from_str(value).map_err(|e| ScraperError::InvalidHeader {
        value: value.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
