// Converts either payload shape (structured arrays or extracted HTML rows)
// into one canonical ordered series. Data-quality problems degrade to `None`
// cells, dropped rows or an empty series, never an error.
use crate::model::{CanonicalBar, CanonicalSeries, RawTable, SeriesPayload};
use crate::utils::{clean_numeric, epoch_to_date, parse_date_day_first};
use tracing::debug;

#[derive(Debug, Default)]
struct ColumnMap {
    date: Option<usize>,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    volume: Option<usize>,
}

/// Reconciles header names to canonical roles by case-insensitive substring.
/// Each column takes the first role it matches, each role keeps the first
/// column that claimed it; everything else is dropped.
fn map_columns(headers: &[String]) -> ColumnMap {
    let mut map = ColumnMap::default();
    for (i, header) in headers.iter().enumerate() {
        let lower = header.to_lowercase();
        if lower.contains("date") {
            map.date.get_or_insert(i);
        } else if lower.contains("close") {
            map.close.get_or_insert(i);
        } else if lower.contains("open") {
            map.open.get_or_insert(i);
        } else if lower.contains("high") {
            map.high.get_or_insert(i);
        } else if lower.contains("low") {
            map.low.get_or_insert(i);
        } else if lower.contains("volume") {
            map.volume.get_or_insert(i);
        }
    }
    map
}

fn numeric_cell(row: &[String], index: Option<usize>) -> Option<f64> {
    index.and_then(|i| row.get(i)).and_then(|s| clean_numeric(s))
}

/// Normalizes an extracted HTML table. Date cells parse day-first; rows
/// whose date cell does not parse are dropped.
pub fn normalize_table(table: &RawTable) -> CanonicalSeries {
    let map = map_columns(&table.headers);
    let Some(date_idx) = map.date else {
        debug!("no date column recognized, dropping table");
        return CanonicalSeries::default();
    };

    let bars: Vec<CanonicalBar> = table
        .rows
        .iter()
        .filter_map(|row| {
            let date = parse_date_day_first(row.get(date_idx)?)?;
            Some(CanonicalBar {
                date,
                open: numeric_cell(row, map.open),
                high: numeric_cell(row, map.high),
                low: numeric_cell(row, map.low),
                close: numeric_cell(row, map.close),
                volume: numeric_cell(row, map.volume),
            })
        })
        .collect();

    debug!(rows = table.rows.len(), bars = bars.len(), "table normalized");
    finish(bars)
}

/// Normalizes a structured payload: `t` is epoch seconds UTC, value arrays
/// are index-aligned with it. Missing or non-finite entries become `None`.
pub fn normalize_payload(payload: &SeriesPayload) -> CanonicalSeries {
    let value_at = |arr: &Option<Vec<f64>>, i: usize| -> Option<f64> {
        arr.as_ref()
            .and_then(|v| v.get(i))
            .copied()
            .filter(|x| x.is_finite())
    };

    let bars: Vec<CanonicalBar> = payload
        .t
        .iter()
        .enumerate()
        .filter_map(|(i, &secs)| {
            let date = epoch_to_date(secs)?;
            Some(CanonicalBar {
                date,
                open: value_at(&payload.o, i),
                high: value_at(&payload.h, i),
                low: value_at(&payload.l, i),
                close: value_at(&payload.c, i),
                volume: value_at(&payload.v, i),
            })
        })
        .collect();

    debug!(points = payload.t.len(), bars = bars.len(), "payload normalized");
    finish(bars)
}

/// Sorts ascending and collapses duplicate dates, keeping the last occurrence
/// (a repeated row from the same scrape supersedes the earlier one).
fn finish(mut bars: Vec<CanonicalBar>) -> CanonicalSeries {
    bars.sort_by_key(|b| b.date);
    // The sort is stable, so reversing puts the last occurrence of each date
    // first and dedup keeps it.
    bars.reverse();
    bars.dedup_by_key(|b| b.date);
    bars.reverse();
    CanonicalSeries::new(bars)
}
