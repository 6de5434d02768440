// Heuristic extraction of the historical-OHLCV table from an arbitrary HTML
// document. The upstream page layout is not contractually stable, so table
// selection is a prioritized list of matchers evaluated in order.
use crate::model::RawTable;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Canonical column names assigned when the header row cannot be trusted.
const PRIORITY_COLUMNS: &[&str] = &[
    "Date", "Open", "High", "Low", "Close", "Volume", "Change", "%Change", "Prev Close",
];

/// One `<table>` lifted to strings: header-cell texts plus every row's cell
/// texts, unfiltered.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

type TableMatcher = fn(&ParsedTable) -> bool;

/// Evaluated in order against every table in the document; the first table
/// matched by the earliest matcher wins.
const MATCHERS: &[TableMatcher] = &[has_date_and_close_headers, has_substantial_body];

fn has_date_and_close_headers(table: &ParsedTable) -> bool {
    let mut has_date = false;
    let mut has_close = false;
    for header in &table.headers {
        let lower = header.to_lowercase();
        has_date |= lower.contains("date");
        has_close |= lower.contains("close");
    }
    has_date && has_close
}

fn has_substantial_body(table: &ParsedTable) -> bool {
    table.rows.len() > 3
}

pub struct TableExtractor;

impl TableExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Locates the most likely OHLCV table and lifts it to string cells. A
    /// document with no usable table yields an empty `RawTable`, not an
    /// error; the caller degrades to an empty series.
    pub fn extract(&self, html: &str) -> RawTable {
        let document = Html::parse_document(html);
        let tables = parse_tables(&document);

        let Some(candidate) = select_candidate(&tables) else {
            debug!(tables = tables.len(), "no table matched any heuristic");
            return RawTable::default();
        };
        build_raw_table(candidate)
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_tables(document: &Html) -> Vec<ParsedTable> {
    let table_selector = Selector::parse("table").unwrap();
    let header_selector = Selector::parse("th").unwrap();
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td, th").unwrap();

    document
        .select(&table_selector)
        .map(|table| {
            let headers = table
                .select(&header_selector)
                .map(cell_text)
                .collect::<Vec<_>>();
            let rows = table
                .select(&row_selector)
                .map(|row| row.select(&cell_selector).map(cell_text).collect::<Vec<_>>())
                .filter(|cells: &Vec<String>| !cells.is_empty())
                .collect::<Vec<_>>();
            ParsedTable { headers, rows }
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Ordered heuristic over all parsed tables; `None` when the document has no
/// usable table at all.
pub fn select_candidate(tables: &[ParsedTable]) -> Option<&ParsedTable> {
    MATCHERS
        .iter()
        .find_map(|matcher| tables.iter().find(|t| matcher(t)))
}

/// Filters the candidate's rows and resolves its header names.
fn build_raw_table(candidate: &ParsedTable) -> RawTable {
    let rows: Vec<Vec<String>> = candidate
        .rows
        .iter()
        // A repeated header row inside the body carries no data.
        .filter(|cells| candidate.headers.is_empty() || **cells != candidate.headers)
        .filter(|cells| cells.len() >= 2)
        .cloned()
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let headers = if !candidate.headers.is_empty() && candidate.headers.len() == width {
        candidate.headers.clone()
    } else {
        let mut names: Vec<String> = PRIORITY_COLUMNS
            .iter()
            .take(width)
            .map(|s| s.to_string())
            .collect();
        for i in names.len()..width {
            names.push(format!("col{i}"));
        }
        names
    };

    debug!(rows = rows.len(), columns = headers.len(), "table extracted");
    RawTable { headers, rows }
}
