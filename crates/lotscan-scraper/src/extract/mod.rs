//! Record Extractor: one detail page in, one [`VehicleRecord`] out.
//!
//! Each field runs its own cascade and an absent value is an empty string,
//! never an error. Extraction is a pure function of the page, so re-running it
//! on the same HTML yields an identical record.

mod condition;
mod content;
mod identifiers;
mod price;
mod rules;
mod specs;
mod structured;

use lotscan_core::{VehicleRecord, Vocabulary};

use crate::page::ParsedPage;
use crate::title::parse_vehicle_title;
use rules::{first_match, non_empty, PageView, Rule, Source};

/// Generic `<h1>` first, then class-qualified title headings.
const TITLE_RULES: &[Rule] = &[
    Rule::new(Source::Selector("h1"), non_empty),
    Rule::new(Source::Selector(".vehicle-title, .vdp-title"), non_empty),
    Rule::new(Source::Selector("h2.vehicle-title, h2.vdp-title, h2"), non_empty),
];

/// Extracts records with a fixed vocabulary and feed label.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    vocabulary: Vocabulary,
    feed_label: String,
}

impl RecordExtractor {
    #[must_use]
    pub fn new(vocabulary: Vocabulary, feed_label: impl Into<String>) -> Self {
        Self {
            vocabulary,
            feed_label: feed_label.into(),
        }
    }

    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub fn extract(&self, page: &ParsedPage) -> VehicleRecord {
        extract_record(page, &self.vocabulary, &self.feed_label)
    }
}

/// Builds the record for one parsed detail page.
///
/// Order matters only for the fallbacks: structured data backfills whatever
/// the page heuristics missed, and the mileage-based condition and
/// model-based body style are applied last, to fields still empty.
#[must_use]
pub fn extract_record(page: &ParsedPage, vocab: &Vocabulary, feed_label: &str) -> VehicleRecord {
    let view = PageView::new(page);
    let mut record = VehicleRecord::for_url(page.url());

    record.feed_label = feed_label.to_owned();
    record.title = first_match(&view, TITLE_RULES).unwrap_or_default();
    apply_title_parts(&mut record, vocab);

    record.condition = condition::condition_from_url(page.url())
        .or_else(|| condition::condition_from_badges(page))
        .map(|c| c.as_str().to_owned())
        .unwrap_or_default();

    record.stock_number = first_match(&view, identifiers::STOCK_RULES).unwrap_or_default();
    record.vin = first_match(&view, identifiers::VIN_RULES).unwrap_or_default();

    let prices = price::extract_prices(&view);
    record.price = prices.price;
    record.msrp = prices.msrp;
    record.all_in_price = prices.all_in;

    record.mileage = first_match(&view, specs::MILEAGE_RULES).unwrap_or_default();
    record.color = first_match(&view, specs::COLOR_RULES).unwrap_or_default();
    record.engine = first_match(&view, specs::ENGINE_RULES).unwrap_or_default();
    record.body_style = first_match(&view, specs::BODY_STYLE_RULES).unwrap_or_default();

    record.description = content::extract_description(page).unwrap_or_default();
    record.vehicle_options = content::extract_options(page).unwrap_or_default();
    record.certified_pre_owned = content::extract_certified(page).unwrap_or_default();
    record.image_link = content::extract_image(page).unwrap_or_default();

    if structured::overlay_structured_data(page, &mut record) {
        apply_title_parts(&mut record, vocab);
    }

    if record.condition.is_empty() {
        if let Some(inferred) = condition::condition_from_mileage(&record.mileage) {
            tracing::debug!(url = page.url(), "condition inferred from mileage");
            record.condition = inferred.as_str().to_owned();
        }
    }
    if record.body_style.is_empty() {
        if let Some(style) = vocab.body_style_for_model(&record.model) {
            record.body_style = style.to_owned();
        }
    }

    log_misses(&record);
    record
}

/// Copies title parts into fields that are still empty.
fn apply_title_parts(record: &mut VehicleRecord, vocab: &Vocabulary) {
    if record.title.is_empty() {
        return;
    }
    let parsed = parse_vehicle_title(&record.title, vocab);
    for (slot, value) in [
        (&mut record.year, parsed.year),
        (&mut record.brand, parsed.make),
        (&mut record.model, parsed.model),
        (&mut record.trim_or_sub_model, parsed.trim),
    ] {
        if slot.is_empty() {
            *slot = value;
        }
    }
}

fn log_misses(record: &VehicleRecord) {
    let missing: Vec<&str> = [
        ("title", &record.title),
        ("price", &record.price),
        ("vin", &record.vin),
        ("stock", &record.stock_number),
        ("mileage", &record.mileage),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
    .collect();
    if !missing.is_empty() {
        tracing::debug!(
            url = %record.detail_page_url,
            missing = ?missing,
            "fields not found on detail page"
        );
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
