//! Command handlers: run the scraper, then hand the records to the sink.
//!
//! Per-page failures never reach here; the pipeline logs and skips them. Only
//! setup errors propagate, and a failed upload turns into a non-zero exit.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use lotscan_core::{load_vocabulary, AppConfig, VehicleRecord, Vocabulary};
use lotscan_scraper::InventoryScraper;
use lotscan_sheets::SheetsClient;

/// Loads the vocabulary override when configured, else the built-in one.
pub(crate) fn vocabulary_for(config: &AppConfig) -> anyhow::Result<Vocabulary> {
    match &config.vocabulary_path {
        Some(path) => load_vocabulary(path)
            .with_context(|| format!("failed to load vocabulary from {}", path.display())),
        None => Ok(Vocabulary::builtin()),
    }
}

fn build_scraper(config: &AppConfig) -> anyhow::Result<InventoryScraper> {
    let vocabulary = vocabulary_for(config)?;
    InventoryScraper::from_config(config, vocabulary).context("failed to build inventory scraper")
}

/// Scrape the inventory, optionally dump JSON, then upload when credentials
/// are configured.
///
/// # Errors
///
/// Returns an error if the scraper or sink cannot be constructed or the JSON
/// file cannot be written.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    no_upload: bool,
    json_path: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let scraper = build_scraper(config)?;
    tracing::info!(
        listing_pages = config.listing_urls.len(),
        site = %config.site_base_url,
        "starting inventory scrape"
    );
    let records = scraper.scrape_inventory(&config.listing_urls).await;

    if let Some(path) = json_path {
        write_json(path, &records)?;
        tracing::info!(path = %path.display(), records = records.len(), "wrote JSON export");
    }

    if records.is_empty() {
        tracing::warn!("no vehicles were scraped; nothing to upload");
        return Ok(ExitCode::SUCCESS);
    }

    if no_upload {
        tracing::info!(records = records.len(), "upload skipped (--no-upload)");
        return Ok(ExitCode::SUCCESS);
    }

    let Some((credentials, sheet_id)) = config.sheet_credentials() else {
        tracing::info!(
            records = records.len(),
            "GOOGLE_CREDENTIALS or GOOGLE_SHEET_ID not set; skipping upload"
        );
        return Ok(ExitCode::SUCCESS);
    };

    let sink = SheetsClient::new(
        credentials,
        sheet_id,
        &config.worksheet_title,
        config.request_timeout_secs,
    )
    .context("failed to build Google Sheets client")?;

    if sink.upload_vehicles(&records).await {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::error!(
            service_email = sink.service_email(),
            "upload failed; make sure the sheet is shared with the service account"
        );
        Ok(ExitCode::FAILURE)
    }
}

/// Print every collected detail-page URL, one per line.
///
/// # Errors
///
/// Returns an error if the scraper cannot be constructed.
pub(crate) async fn run_links(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let scraper = build_scraper(config)?;
    let links = scraper.collect_links(&config.listing_urls).await;
    for link in &links {
        println!("{link}");
    }
    Ok(ExitCode::SUCCESS)
}

fn write_json(path: &Path, records: &[VehicleRecord]) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(records).context("failed to serialize records")?;
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}
