use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_SITE_BASE_URL: &str = "https://www.reddeertoyota.com";
/// Browser-like user agent sent with every page and API request unless overridden.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Builds the default listing-page list: new then used inventory, `pages`
/// pages each (`/inventory/new/`, `/inventory/new/?page=2`, ...).
#[must_use]
pub fn default_listing_urls(site_base_url: &str, pages: u32) -> Vec<String> {
    let base = site_base_url.trim_end_matches('/');
    ["new", "used"]
        .iter()
        .flat_map(|condition| {
            (1..=pages).map(move |page| {
                if page == 1 {
                    format!("{base}/inventory/{condition}/")
                } else {
                    format!("{base}/inventory/{condition}/?page={page}")
                }
            })
        })
        .collect()
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let site_base_url = or_default("LOTSCAN_SITE_BASE_URL", DEFAULT_SITE_BASE_URL);
    if !(site_base_url.starts_with("http://") || site_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "LOTSCAN_SITE_BASE_URL".to_string(),
            reason: format!("\"{site_base_url}\" is not an http(s) URL"),
        });
    }

    let listing_pages = parse_u32("LOTSCAN_LISTING_PAGES", "3")?;
    let listing_urls = match optional("LOTSCAN_LISTING_URLS") {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect(),
        None => default_listing_urls(&site_base_url, listing_pages),
    };

    let bind_addr = or_default("LOTSCAN_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "LOTSCAN_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;

    let request_timeout_secs = parse_u64("LOTSCAN_REQUEST_TIMEOUT_SECS", "30")?;
    let inter_request_delay_ms = parse_u64("LOTSCAN_INTER_REQUEST_DELAY_MS", "1000")?;

    Ok(AppConfig {
        log_level: or_default("LOTSCAN_LOG_LEVEL", "info"),
        bind_addr,
        site_base_url,
        listing_urls,
        vocabulary_path: optional("LOTSCAN_VOCABULARY_PATH").map(PathBuf::from),
        feed_label: optional("LOTSCAN_FEED_LABEL").unwrap_or_default(),
        request_timeout_secs,
        user_agent: or_default("LOTSCAN_USER_AGENT", DEFAULT_USER_AGENT),
        inter_request_delay_ms,
        worksheet_title: or_default("LOTSCAN_WORKSHEET_TITLE", "Vehicle Inventory"),
        google_credentials: optional("GOOGLE_CREDENTIALS"),
        google_sheet_id: optional("GOOGLE_SHEET_ID"),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
