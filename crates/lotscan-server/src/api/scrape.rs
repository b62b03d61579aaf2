//! `GET /api/scrape`: one full scrape-and-upload run, answered when it ends.
//!
//! An empty run is a 500 with `{"error": "No vehicles scraped"}`. When sheet
//! credentials are configured a failed upload is a 500 too; without them the
//! run succeeds with `uploaded: false`.

use axum::{extract::State, http::StatusCode, Json};
use lotscan_scraper::InventoryScraper;
use lotscan_sheets::SheetsClient;
use serde::Serialize;

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ScrapeSummary {
    success: bool,
    vehicles_scraped: usize,
    uploaded: bool,
    message: String,
}

pub(super) async fn trigger_scrape(
    State(state): State<AppState>,
) -> Result<Json<ScrapeSummary>, ApiError> {
    let Ok(_running) = state.run_lock.try_lock() else {
        tracing::warn!("scrape trigger refused: a run is already in progress");
        return Err(ApiError::new(StatusCode::CONFLICT, "A scrape is already running"));
    };

    let config = &state.config;
    let scraper = InventoryScraper::from_config(config, state.vocabulary.as_ref().clone())
        .map_err(|e| {
            tracing::error!(error = %e, "failed to build inventory scraper");
            ApiError::internal(e.to_string())
        })?;

    tracing::info!(
        listing_pages = config.listing_urls.len(),
        site = %config.site_base_url,
        "scrape triggered over HTTP"
    );
    let records = scraper.scrape_inventory(&config.listing_urls).await;
    let count = records.len();
    if records.is_empty() {
        tracing::warn!("no vehicles were scraped");
        return Err(ApiError::internal("No vehicles scraped"));
    }

    let Some((credentials, sheet_id)) = config.sheet_credentials() else {
        tracing::info!(records = count, "Google Sheets not configured; skipping upload");
        return Ok(Json(ScrapeSummary {
            success: true,
            vehicles_scraped: count,
            uploaded: false,
            message: format!(
                "Successfully scraped {count} vehicles; Google Sheets upload is not configured"
            ),
        }));
    };

    let sink = SheetsClient::new(
        credentials,
        sheet_id,
        &config.worksheet_title,
        config.request_timeout_secs,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "failed to build Google Sheets client");
        ApiError::internal(format!("failed to build Google Sheets client: {e}"))
    })?;

    if !sink.upload_vehicles(&records).await {
        return Err(ApiError::internal(format!(
            "Scraped {count} vehicles but the Google Sheets upload failed; \
             make sure the sheet is shared with {}",
            sink.service_email()
        )));
    }

    Ok(Json(ScrapeSummary {
        success: true,
        vehicles_scraped: count,
        uploaded: true,
        message: format!("Successfully scraped {count} vehicles and uploaded to Google Sheets"),
    }))
}
