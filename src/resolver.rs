// Symbol resolution: canonical tickers pass through, free text goes through
// the autosuggest collaborator, and any lookup failure falls back to a local
// normalization. Resolution never fails.
use crate::model::ResolvedSymbol;
use serde::Deserialize;
use tracing::debug;

/// One autosuggest result. Fields are best-effort; the portal does not
/// guarantee any of them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestHit {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, alias = "sc_id")]
    pub scrip_code: Option<u64>,
    #[serde(default, alias = "link_src", alias = "url")]
    pub link_path: Option<String>,
}

/// Fuzzy name-resolution capability. One attempt per call; timeout is the
/// implementor's concern.
#[async_trait::async_trait]
pub trait SuggestLookup: Send + Sync {
    async fn query(&self, text: &str) -> Option<SuggestHit>;
}

pub struct SymbolResolver {
    lookup: Option<Box<dyn SuggestLookup>>,
}

impl SymbolResolver {
    pub fn new(lookup: impl SuggestLookup + 'static) -> Self {
        Self {
            lookup: Some(Box::new(lookup)),
        }
    }

    /// Resolver without a suggest capability: fast path and byte-level
    /// fallback only.
    pub fn offline() -> Self {
        Self { lookup: None }
    }

    /// Maps a user-supplied name or ticker to a source identifier. Always
    /// produces some string.
    pub async fn resolve(&self, input: &str) -> ResolvedSymbol {
        if is_canonical_ticker(input) {
            return ResolvedSymbol(input.to_string());
        }

        if let Some(lookup) = &self.lookup {
            if let Some(symbol) = lookup.query(input).await.as_ref().and_then(pick_symbol) {
                debug!(input, symbol = %symbol, "resolved via suggest lookup");
                return ResolvedSymbol(symbol);
            }
        }

        let fallback: String = input.split_whitespace().collect::<String>().to_uppercase();
        debug!(input, fallback = %fallback, "suggest lookup exhausted, using fallback");
        ResolvedSymbol(fallback)
    }
}

/// Already-canonical tickers skip the lookup entirely: uppercase, at most 20
/// bytes, no internal whitespace.
fn is_canonical_ticker(input: &str) -> bool {
    !input.is_empty()
        && input.len() <= 20
        && !input.chars().any(char::is_whitespace)
        && input == input.to_uppercase()
}

/// Preference order over a hit: explicit symbol, then stringified scrip
/// code, then the trailing path segment of the link, upper-cased.
fn pick_symbol(hit: &SuggestHit) -> Option<String> {
    if let Some(symbol) = hit.symbol.as_ref().filter(|s| !s.is_empty()) {
        return Some(symbol.clone());
    }
    if let Some(code) = hit.scrip_code {
        return Some(code.to_string());
    }
    if let Some(link) = &hit.link_path {
        let segment = link.trim_end_matches('/').rsplit('/').next()?;
        if !segment.is_empty() {
            return Some(segment.to_uppercase());
        }
    }
    None
}
