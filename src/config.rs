use serde::Deserialize;
use std::fs;

/// Endpoint and transport settings for the HTTP data source. All fields have
/// working defaults; a JSON file can override them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Structured time-series endpoint, `{symbol}`/`{from}`/`{to}`/`{resolution}`
    /// substituted at request time.
    pub series_url: String,
    /// Quote-page URL used for the HTML fallback, `{query}` substituted.
    pub document_url: String,
    /// Autosuggest endpoint for fuzzy symbol resolution, `{query}` substituted.
    pub suggest_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// Bar resolution requested from the structured endpoint.
    pub resolution: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            series_url: "https://priceapi.moneycontrol.com/techCharts/history?symbol={symbol}&resolution={resolution}&from={from}&to={to}"
                .to_string(),
            document_url:
                "https://www.moneycontrol.com/india/stockpricequote.php?searchtxt={query}"
                    .to_string(),
            suggest_url:
                "https://www.moneycontrol.com/mccode/common/autosuggestion_solr.php?query={query}&type=1"
                    .to_string(),
            user_agent: "Mozilla/5.0 (compatible; tickline/0.1)".to_string(),
            timeout_seconds: 10,
            resolution: "1D".to_string(),
        }
    }
}

pub fn load_config(path: &str) -> Result<SourceConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: SourceConfig = serde_json::from_str(&content)?;
    Ok(config)
}
