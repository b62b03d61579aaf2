//! Vehicle listing record and the fixed spreadsheet schema it is written with.

use serde::{Deserialize, Serialize};

/// Spreadsheet header row, in output column order.
pub const COLUMN_HEADERS: [&str; 21] = [
    "title",
    "id / stock-#",
    "price",
    "condition",
    "feed label",
    "body style",
    "brand",
    "certified pre-owned",
    "color",
    "description",
    "engine",
    "image link",
    "link",
    "mileage",
    "model",
    "trim / sub-model",
    "vehicle MSRP",
    "vehicle all in price",
    "vehicle option",
    "vin",
    "year",
];

/// One vehicle scraped from a dealership detail page.
///
/// Every field is a plain string; an empty string means the value was not
/// found on the page. `detail_page_url` is the only field that is always set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub title: String,
    pub stock_number: String,
    /// Advertised selling price, digits only (e.g. `"39999"`).
    pub price: String,
    /// `"new"`, `"used"`, or empty.
    pub condition: String,
    pub feed_label: String,
    pub body_style: String,
    pub brand: String,
    /// `"yes"` when the page advertises certified pre-owned status.
    pub certified_pre_owned: String,
    pub color: String,
    pub description: String,
    pub engine: String,
    pub image_link: String,
    pub detail_page_url: String,
    /// Odometer reading, digits only.
    pub mileage: String,
    pub model: String,
    pub trim_or_sub_model: String,
    pub msrp: String,
    pub all_in_price: String,
    /// Feature list joined with `"; "`.
    pub vehicle_options: String,
    pub vin: String,
    pub year: String,
}

impl VehicleRecord {
    /// Creates an empty record for the given detail page.
    #[must_use]
    pub fn for_url(detail_page_url: &str) -> Self {
        Self {
            detail_page_url: detail_page_url.to_owned(),
            ..Self::default()
        }
    }

    /// Returns the record as one spreadsheet row, in [`COLUMN_HEADERS`] order.
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        [
            &self.title,
            &self.stock_number,
            &self.price,
            &self.condition,
            &self.feed_label,
            &self.body_style,
            &self.brand,
            &self.certified_pre_owned,
            &self.color,
            &self.description,
            &self.engine,
            &self.image_link,
            &self.detail_page_url,
            &self.mileage,
            &self.model,
            &self.trim_or_sub_model,
            &self.msrp,
            &self.all_in_price,
            &self.vehicle_options,
            &self.vin,
            &self.year,
        ]
        .into_iter()
        .cloned()
        .collect()
    }
}

/// A free-text title decomposed into its year, make, model, and trim parts.
///
/// Intermediate only; the parts are copied into a [`VehicleRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleParseResult {
    pub year: String,
    pub make: String,
    pub model: String,
    pub trim: String,
}

/// Inventory condition of a listed vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    New,
    Used,
}

impl Condition {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
