use crate::model::{FetchError, ResolvedSymbol, SeriesPayload};
use chrono::{DateTime, Duration, Utc};

/// Remote OHLCV capability. Pure I/O boundary: one network call per method,
/// transport failures surfaced as [`FetchError`], no parsing beyond body
/// decode, no retries.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Structured time-series endpoint. `from`/`to` default to a trailing
    /// 365-day window ending now.
    async fn fetch_series(
        &self,
        symbol: &ResolvedSymbol,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        resolution: Option<&str>,
    ) -> Result<SeriesPayload, FetchError>;

    /// Fallback quote-page fetch, returning the raw HTML text.
    async fn fetch_document(&self, symbol_or_name: &str) -> Result<String, FetchError>;
}

/// Trailing one-year window ending now, applied when the caller leaves
/// `from`/`to` unset.
pub fn default_window() -> (DateTime<Utc>, DateTime<Utc>) {
    let to = Utc::now();
    (to - Duration::days(365), to)
}
