use crate::config::SourceConfig;
use crate::fetcher::traits::{DataSource, default_window};
use crate::model::{FetchError, FetchStage, ResolvedSymbol, SeriesPayload};
use crate::resolver::{SuggestHit, SuggestLookup};
use chrono::{DateTime, Utc};
use reqwest::Client;
use tracing::{debug, warn};

/// HTTP implementation of both remote capabilities: the structured series
/// endpoint, the quote-page document fetch and the autosuggest lookup.
pub struct HttpDataSource {
    client: Client,
    config: SourceConfig,
}

impl HttpDataSource {
    pub fn new(config: SourceConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("http client construction");

        Self { client, config }
    }

    fn series_url(
        &self,
        symbol: &ResolvedSymbol,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        resolution: &str,
    ) -> String {
        self.config
            .series_url
            .replace("{symbol}", symbol.as_str())
            .replace("{resolution}", resolution)
            .replace("{from}", &from.timestamp().to_string())
            .replace("{to}", &to.timestamp().to_string())
    }

    fn query_url(&self, template: &str, query: &str) -> String {
        template.replace("{query}", &query.replace(' ', "+"))
    }

    fn transport_error(symbol: &str, stage: FetchStage, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                symbol: symbol.to_string(),
                stage,
            }
        } else {
            FetchError::Http {
                symbol: symbol.to_string(),
                stage,
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait::async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_series(
        &self,
        symbol: &ResolvedSymbol,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        resolution: Option<&str>,
    ) -> Result<SeriesPayload, FetchError> {
        let (default_from, default_to) = default_window();
        let from = from.unwrap_or(default_from);
        let to = to.unwrap_or(default_to);
        let resolution = resolution.unwrap_or(&self.config.resolution);
        let url = self.series_url(symbol, from, to, resolution);
        debug!(symbol = %symbol, %url, "fetching structured series");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::transport_error(symbol.as_str(), FetchStage::Series, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                symbol: symbol.to_string(),
                stage: FetchStage::Series,
                status: status.as_u16(),
            });
        }

        response
            .json::<SeriesPayload>()
            .await
            .map_err(|e| FetchError::MalformedBody {
                symbol: symbol.to_string(),
                stage: FetchStage::Series,
                reason: e.to_string(),
            })
    }

    async fn fetch_document(&self, symbol_or_name: &str) -> Result<String, FetchError> {
        let url = self.query_url(&self.config.document_url, symbol_or_name);
        debug!(symbol = symbol_or_name, %url, "fetching quote document");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::transport_error(symbol_or_name, FetchStage::Document, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                symbol: symbol_or_name.to_string(),
                stage: FetchStage::Document,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::MalformedBody {
                symbol: symbol_or_name.to_string(),
                stage: FetchStage::Document,
                reason: e.to_string(),
            })
    }
}

/// Best-effort autosuggest: any transport or decode problem is swallowed,
/// because the resolver has its own fallback.
#[async_trait::async_trait]
impl SuggestLookup for HttpDataSource {
    async fn query(&self, text: &str) -> Option<SuggestHit> {
        let url = self.query_url(&self.config.suggest_url, text);
        let response = match self.client.get(&url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!(text, status = %r.status(), "suggest lookup rejected");
                return None;
            }
            Err(e) => {
                warn!(text, error = %e, "suggest lookup unreachable");
                return None;
            }
        };

        let body: serde_json::Value = response.json().await.ok()?;
        // The endpoint answers either a bare array of hits or an object
        // wrapping one; take the first hit either way.
        let first = match &body {
            serde_json::Value::Array(items) => items.first()?.clone(),
            other => other.clone(),
        };
        serde_json::from_value::<SuggestHit>(first).ok()
    }
}
