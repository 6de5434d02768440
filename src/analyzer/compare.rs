// Cross-series alignment: outer-joined comparison table and Pearson
// correlation of percentage-change sequences over the inner join.
use crate::model::{CanonicalSeries, PriceField};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Outer join of several series on date: one row per date seen anywhere, one
/// column per input key, `None` where a series has no bar for that date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}

pub fn compare(inputs: &[(&str, &CanonicalSeries)], field: PriceField) -> ComparisonTable {
    let mut all_dates: BTreeSet<NaiveDate> = BTreeSet::new();
    for (_, series) in inputs {
        all_dates.extend(series.bars.iter().map(|b| b.date));
    }
    let dates: Vec<NaiveDate> = all_dates.into_iter().collect();

    let columns = inputs
        .iter()
        .map(|(name, series)| {
            let by_date: BTreeMap<NaiveDate, Option<f64>> = series
                .bars
                .iter()
                .map(|b| (b.date, b.field(field)))
                .collect();
            let cells = dates
                .iter()
                .map(|d| by_date.get(d).copied().flatten())
                .collect();
            (name.to_string(), cells)
        })
        .collect();

    ComparisonTable { dates, columns }
}

/// Pearson correlation of the two series' close-to-close percentage changes,
/// inner-joined on date. Undefined with fewer than two overlapping change
/// pairs or zero variance on either side.
pub fn correlate(a: &CanonicalSeries, b: &CanonicalSeries) -> Option<f64> {
    let joined: Vec<(Option<f64>, Option<f64>)> = a
        .bars
        .iter()
        .filter_map(|bar| b.bar_on(bar.date).map(|other| (bar.close, other.close)))
        .collect();

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for pair in joined.windows(2) {
        let (x, y) = (pct_change(pair[0].0, pair[1].0), pct_change(pair[0].1, pair[1].1));
        if let (Some(x), Some(y)) = (x, y) {
            xs.push(x);
            ys.push(y);
        }
    }
    pearson(&xs, &ys)
}

fn pct_change(prev: Option<f64>, curr: Option<f64>) -> Option<f64> {
    let (prev, curr) = (prev?, curr?);
    if prev == 0.0 {
        return None;
    }
    Some((curr - prev) / prev * 100.0)
}

/// Pearson correlation coefficient; `None` for mismatched/short inputs or a
/// zero denominator.
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let numerator: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let denom_x: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let denom_y: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
    let denominator = (denom_x * denom_y).sqrt();
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}
