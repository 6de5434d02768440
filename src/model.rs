// Core structs: CanonicalBar, CanonicalSeries, payload and table shapes, errors.
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// One trading-day observation. Prices are in the upstream's own currency
/// units; cells the source could not provide stay `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl CanonicalBar {
    pub fn field(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::Volume => self.volume,
        }
    }
}

/// Column selector for analytics functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

/// Date-ascending sequence of bars with unique dates. May be empty; an empty
/// series is a valid input to every analytics function, never an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalSeries {
    pub bars: Vec<CanonicalBar>,
}

impl CanonicalSeries {
    pub fn new(bars: Vec<CanonicalBar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar, if any.
    pub fn latest(&self) -> Option<&CanonicalBar> {
        self.bars.last()
    }

    /// Position of `date` in the series.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&date, |b| b.date).ok()
    }

    pub fn bar_on(&self, date: NaiveDate) -> Option<&CanonicalBar> {
        self.index_of(date).map(|i| &self.bars[i])
    }

    /// Sub-series covering `from..=to` (inclusive on both ends).
    pub fn range(&self, from: NaiveDate, to: NaiveDate) -> CanonicalSeries {
        let bars = self
            .bars
            .iter()
            .filter(|b| b.date >= from && b.date <= to)
            .cloned()
            .collect();
        CanonicalSeries::new(bars)
    }

    /// One column of the series, index-aligned with `bars`.
    pub fn values(&self, field: PriceField) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.field(field)).collect()
    }
}

/// Derived metric aligned to the input series: same length, `None` wherever
/// the value is undefined (unfilled window, zero denominator, missing cell).
pub type IndicatorSeries = Vec<Option<f64>>;

/// Either an already-fetched series or a name/ticker to resolve and fetch.
/// Resolved exactly once at the client boundary.
#[derive(Debug, Clone)]
pub enum SeriesInput {
    Raw(CanonicalSeries),
    Lookup(String),
}

impl From<CanonicalSeries> for SeriesInput {
    fn from(series: CanonicalSeries) -> Self {
        SeriesInput::Raw(series)
    }
}

impl From<&str> for SeriesInput {
    fn from(name: &str) -> Self {
        SeriesInput::Lookup(name.to_string())
    }
}

/// Identifier string understood by the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol(pub String);

impl ResolvedSymbol {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResolvedSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structured time-series payload: index-aligned arrays keyed by
/// single-letter fields, `t` in epoch seconds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesPayload {
    #[serde(default)]
    pub t: Vec<i64>,
    #[serde(default)]
    pub o: Option<Vec<f64>>,
    #[serde(default)]
    pub h: Option<Vec<f64>>,
    #[serde(default)]
    pub l: Option<Vec<f64>>,
    #[serde(default)]
    pub c: Option<Vec<f64>>,
    #[serde(default)]
    pub v: Option<Vec<f64>>,
}

/// Untyped table of string cells plus a resolved header, as lifted out of an
/// HTML document. Consumed only by the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Which fetch the transport failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Series,
    Document,
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStage::Series => f.write_str("series fetch"),
            FetchStage::Document => f.write_str("document fetch"),
        }
    }
}

/// Transport/HTTP failures. Surfaced to the caller, never retried here.
/// Data-quality problems are not errors: they collapse to empty series.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request for '{symbol}' failed during {stage}: {reason}")]
    Http {
        symbol: String,
        stage: FetchStage,
        reason: String,
    },
    #[error("request for '{symbol}' timed out during {stage}")]
    Timeout { symbol: String, stage: FetchStage },
    #[error("unexpected status {status} for '{symbol}' during {stage}")]
    Status {
        symbol: String,
        stage: FetchStage,
        status: u16,
    },
    #[error("malformed body for '{symbol}' during {stage}: {reason}")]
    MalformedBody {
        symbol: String,
        stage: FetchStage,
        reason: String,
    },
}
