// Parser module: HTML table extraction and the quote-page summary scrape.

pub mod snapshot;
pub mod table;

pub use snapshot::parse_snapshot;
pub use table::TableExtractor;
