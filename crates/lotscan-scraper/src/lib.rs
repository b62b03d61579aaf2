pub mod client;
pub mod error;
pub mod extract;
pub mod links;
pub mod page;
pub mod pipeline;
pub mod text;
pub mod title;

pub use client::{PageClient, RequestProfile};
pub use error::ScraperError;
pub use extract::{extract_record, RecordExtractor};
pub use links::{collect_detail_links, extract_detail_links};
pub use page::ParsedPage;
pub use pipeline::InventoryScraper;
pub use title::parse_vehicle_title;
