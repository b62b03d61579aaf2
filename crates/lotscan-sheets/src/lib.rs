//! Google Sheets sink for scraped vehicle records.

pub mod auth;
pub mod client;
pub mod credentials;
pub mod error;

pub use client::{column_letter, SheetsClient};
pub use credentials::ServiceAccountKey;
pub use error::SheetsError;
