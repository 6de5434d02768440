// High-level orchestration: resolve once, prefer the structured endpoint,
// degrade to HTML table scraping, normalize, and expose the convenience
// accessors on top of the canonical series.
use crate::analyzer::{ComparisonTable, compare, correlate};
use crate::config::SourceConfig;
use crate::fetcher::{DataSource, HttpDataSource};
use crate::model::{
    CanonicalBar, CanonicalSeries, FetchError, PriceField, SeriesInput,
};
use crate::normalizer::{normalize_payload, normalize_table};
use crate::parser::{TableExtractor, parse_snapshot};
use crate::resolver::SymbolResolver;
use chrono::NaiveDate;
use futures::future::join_all;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub struct StockClient {
    resolver: SymbolResolver,
    source: Box<dyn DataSource>,
    extractor: TableExtractor,
}

impl StockClient {
    /// Client against the default portal endpoints.
    pub fn new(config: SourceConfig) -> Self {
        let resolver = SymbolResolver::new(HttpDataSource::new(config.clone()));
        Self::with_parts(resolver, HttpDataSource::new(config))
    }

    /// Client over caller-provided collaborators.
    pub fn with_parts(resolver: SymbolResolver, source: impl DataSource + 'static) -> Self {
        Self {
            resolver,
            source: Box::new(source),
            extractor: TableExtractor::new(),
        }
    }

    /// Full daily history for the input. The structured endpoint is
    /// preferred; on transport failure or an empty payload the quote page is
    /// scraped instead. The error surfaces only when both transports fail.
    pub async fn history(&self, input: impl Into<SeriesInput>) -> Result<CanonicalSeries, FetchError> {
        let name = match input.into() {
            SeriesInput::Raw(series) => return Ok(series),
            SeriesInput::Lookup(name) => name,
        };
        let symbol = self.resolver.resolve(&name).await;

        let series_err = match self.source.fetch_series(&symbol, None, None, None).await {
            Ok(payload) => {
                let series = normalize_payload(&payload);
                if !series.is_empty() {
                    return Ok(series);
                }
                info!(symbol = %symbol, "structured payload empty, trying document scrape");
                None
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "series fetch failed, trying document scrape");
                Some(e)
            }
        };

        match self.source.fetch_document(symbol.as_str()).await {
            Ok(html) => {
                let table = self.extractor.extract(&html);
                Ok(normalize_table(&table))
            }
            Err(doc_err) => match series_err {
                // Both transports failed: surface the structured endpoint's
                // error, it names the primary path.
                Some(e) => {
                    warn!(symbol = %symbol, error = %doc_err, "document fetch failed as well");
                    Err(e)
                }
                // The structured transport worked and simply had no data.
                None => {
                    warn!(symbol = %symbol, error = %doc_err, "document fetch failed, keeping empty series");
                    Ok(CanonicalSeries::default())
                }
            },
        }
    }

    /// History restricted to `from..=to`.
    pub async fn range(
        &self,
        input: impl Into<SeriesInput>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<CanonicalSeries, FetchError> {
        Ok(self.history(input).await?.range(from, to))
    }

    /// Most recent bar, if the series has any.
    pub async fn latest(&self, input: impl Into<SeriesInput>) -> Result<Option<CanonicalBar>, FetchError> {
        Ok(self.history(input).await?.latest().cloned())
    }

    /// One field of the bar on `date`.
    pub async fn field_on(
        &self,
        input: impl Into<SeriesInput>,
        date: NaiveDate,
        field: PriceField,
    ) -> Result<Option<f64>, FetchError> {
        Ok(self
            .history(input)
            .await?
            .bar_on(date)
            .and_then(|bar| bar.field(field)))
    }

    /// Close of the bar preceding `date`; `None` at the first bar or when
    /// `date` is absent.
    pub async fn prev_close(
        &self,
        input: impl Into<SeriesInput>,
        date: NaiveDate,
    ) -> Result<Option<f64>, FetchError> {
        let series = self.history(input).await?;
        let value = match series.index_of(date) {
            Some(i) if i > 0 => series.bars[i - 1].close,
            _ => None,
        };
        Ok(value)
    }

    /// Labeled summary values scraped from the quote page (Open, Prev Close,
    /// Market Cap, ...). Best-effort: absent labels are simply missing.
    pub async fn snapshot(&self, name: &str) -> Result<BTreeMap<String, String>, FetchError> {
        let symbol = self.resolver.resolve(name).await;
        let html = self.source.fetch_document(symbol.as_str()).await?;
        Ok(parse_snapshot(&html))
    }

    /// Fetches every symbol concurrently and outer-joins the chosen field on
    /// date. A transport failure on any symbol surfaces.
    pub async fn compare_symbols(
        &self,
        names: &[&str],
        field: PriceField,
    ) -> Result<ComparisonTable, FetchError> {
        let fetches = names.iter().map(|n| self.history(*n));
        let results = join_all(fetches).await;

        let mut owned: Vec<(&str, CanonicalSeries)> = Vec::with_capacity(names.len());
        for (name, result) in names.iter().zip(results) {
            owned.push((*name, result?));
        }
        let refs: Vec<(&str, &CanonicalSeries)> =
            owned.iter().map(|(n, s)| (*n, s)).collect();
        Ok(compare(&refs, field))
    }

    /// Pearson correlation of two symbols' daily close changes.
    pub async fn correlate_symbols(&self, a: &str, b: &str) -> Result<Option<f64>, FetchError> {
        let (series_a, series_b) = futures::join!(self.history(a), self.history(b));
        Ok(correlate(&series_a?, &series_b?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FetchStage, ResolvedSymbol, SeriesPayload};
    use chrono::{DateTime, Utc};

    /// Canned source: `None` on either side means that transport fails.
    struct StubSource {
        payload: Option<SeriesPayload>,
        html: Option<String>,
    }

    #[async_trait::async_trait]
    impl DataSource for StubSource {
        async fn fetch_series(
            &self,
            symbol: &ResolvedSymbol,
            _from: Option<DateTime<Utc>>,
            _to: Option<DateTime<Utc>>,
            _resolution: Option<&str>,
        ) -> Result<SeriesPayload, FetchError> {
            self.payload.clone().ok_or_else(|| FetchError::Status {
                symbol: symbol.to_string(),
                stage: FetchStage::Series,
                status: 503,
            })
        }

        async fn fetch_document(&self, symbol_or_name: &str) -> Result<String, FetchError> {
            self.html.clone().ok_or_else(|| FetchError::Status {
                symbol: symbol_or_name.to_string(),
                stage: FetchStage::Document,
                status: 503,
            })
        }
    }

    fn client(source: StubSource) -> StockClient {
        StockClient::with_parts(SymbolResolver::offline(), source)
    }

    fn two_bar_payload() -> SeriesPayload {
        SeriesPayload {
            t: vec![1_700_000_000, 1_700_086_400],
            o: Some(vec![10.0, 11.0]),
            h: Some(vec![12.0, 13.0]),
            l: Some(vec![9.0, 10.0]),
            c: Some(vec![11.0, 12.0]),
            v: Some(vec![100.0, 200.0]),
        }
    }

    fn scrape_page() -> String {
        "<table><tr><th>Date</th><th>Close</th></tr>\
         <tr><td>01-02-2024</td><td>10.0</td></tr>\
         <tr><td>02-02-2024</td><td>11.0</td></tr></table>"
            .to_string()
    }

    #[tokio::test]
    async fn structured_payload_is_preferred() {
        let client = client(StubSource {
            payload: Some(two_bar_payload()),
            html: Some(scrape_page()),
        });
        let series = client.history("TCS").await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].close, Some(11.0));
    }

    #[tokio::test]
    async fn series_failure_falls_back_to_scraping() {
        let client = client(StubSource {
            payload: None,
            html: Some(scrape_page()),
        });
        let series = client.history("TCS").await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[1].close, Some(11.0));
    }

    #[tokio::test]
    async fn empty_payload_falls_back_to_scraping() {
        let client = client(StubSource {
            payload: Some(SeriesPayload::default()),
            html: Some(scrape_page()),
        });
        let series = client.history("TCS").await.unwrap();
        assert_eq!(series.len(), 2);
    }

    #[tokio::test]
    async fn both_transports_failing_surfaces_the_series_error() {
        let client = client(StubSource {
            payload: None,
            html: None,
        });
        let err = client.history("TCS").await.unwrap_err();
        match err {
            FetchError::Status { symbol, stage, status } => {
                assert_eq!(symbol, "TCS");
                assert_eq!(stage, FetchStage::Series);
                assert_eq!(status, 503);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_payload_with_failing_document_is_an_empty_series() {
        let client = client(StubSource {
            payload: Some(SeriesPayload::default()),
            html: None,
        });
        let series = client.history("TCS").await.unwrap();
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn raw_input_skips_fetching_entirely() {
        let client = client(StubSource {
            payload: None,
            html: None,
        });
        let series = {
            let payload = two_bar_payload();
            normalize_payload(&payload)
        };
        let out = client.history(series.clone()).await.unwrap();
        assert_eq!(out, series);
    }

    #[tokio::test]
    async fn per_date_accessors_read_the_fetched_series() {
        let client = client(StubSource {
            payload: Some(two_bar_payload()),
            html: None,
        });
        let d0 = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
        let d1 = NaiveDate::from_ymd_opt(2023, 11, 15).unwrap();

        assert_eq!(
            client.field_on("TCS", d1, PriceField::Open).await.unwrap(),
            Some(11.0)
        );
        assert_eq!(client.prev_close("TCS", d1).await.unwrap(), Some(11.0));
        assert_eq!(client.prev_close("TCS", d0).await.unwrap(), None);
        assert_eq!(
            client.latest("TCS").await.unwrap().unwrap().close,
            Some(12.0)
        );
        let sub = client.range("TCS", d1, d1).await.unwrap();
        assert_eq!(sub.len(), 1);
    }

    #[tokio::test]
    async fn compare_symbols_outer_joins_fetched_series() {
        let client = client(StubSource {
            payload: Some(two_bar_payload()),
            html: None,
        });
        let table = client
            .compare_symbols(&["TCS", "INFY"], PriceField::Close)
            .await
            .unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.dates.len(), 2);
        assert_eq!(table.columns[0].1, table.columns[1].1);
    }

    #[tokio::test]
    async fn correlate_symbols_of_identical_sources_is_one() {
        let payload = SeriesPayload {
            t: vec![1_700_000_000, 1_700_086_400, 1_700_172_800, 1_700_259_200],
            c: Some(vec![10.0, 12.0, 11.0, 13.0]),
            ..Default::default()
        };
        let client = client(StubSource {
            payload: Some(payload),
            html: None,
        });
        let r = client.correlate_symbols("TCS", "TCS").await.unwrap().unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn snapshot_reads_the_quote_page() {
        let client = client(StubSource {
            payload: None,
            html: Some(
                "<table><tr><td>Open</td><td>3,500.00</td></tr></table>".to_string(),
            ),
        });
        let snapshot = client.snapshot("TCS").await.unwrap();
        assert_eq!(snapshot.get("Open").map(String::as_str), Some("3,500.00"));
    }
}
