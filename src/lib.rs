//! Daily equity OHLCV ingestion and analytics.
//!
//! Price history comes from a financial portal through two inconsistent
//! transports: a structured JSON time-series endpoint (preferred) and
//! best-effort scraping of the quote page's history table (fallback). Both
//! are reconciled into one canonical date-ascending series, on which a
//! stateless analytics engine computes change metrics, rolling/exponential
//! indicators and cross-series comparisons.
//!
//! ```no_run
//! use tickline::{PriceField, SourceConfig, StockClient, analyzer};
//!
//! # async fn run() -> Result<(), tickline::FetchError> {
//! let client = StockClient::new(SourceConfig::default());
//! let series = client.history("TCS").await?;
//! let sma50 = analyzer::moving_average(&series, 50, PriceField::Close);
//! let rsi14 = analyzer::rsi(&series, 14, PriceField::Close);
//! # let _ = (sma50, rsi14);
//! # Ok(())
//! # }
//! ```
//!
//! Transport failures surface as [`FetchError`]; data-quality gaps never do.
//! They degrade to empty series or `None` cells, because upstream
//! completeness cannot be guaranteed.

pub mod analyzer;
pub mod client;
pub mod config;
pub mod fetcher;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod resolver;
pub mod utils;

pub use analyzer::{
    ComparisonTable, bollinger_bands, cagr, change_series, compare, correlate,
    day_over_day_change, ema, macd, moving_average, rsi, year_to_date_return,
};
pub use client::StockClient;
pub use config::{SourceConfig, load_config};
pub use fetcher::{DataSource, HttpDataSource};
pub use model::{
    CanonicalBar, CanonicalSeries, FetchError, FetchStage, IndicatorSeries, PriceField,
    RawTable, ResolvedSymbol, SeriesInput, SeriesPayload,
};
pub use normalizer::{normalize_payload, normalize_table};
pub use parser::{TableExtractor, parse_snapshot};
pub use resolver::{SuggestHit, SuggestLookup, SymbolResolver};
