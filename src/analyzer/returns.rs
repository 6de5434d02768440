// Change metrics over a canonical series: day-over-day, per-bar change
// series, year-to-date return and CAGR.
use crate::model::{CanonicalSeries, IndicatorSeries};
use chrono::{Datelike, NaiveDate, Utc};

/// Assumed trading days per year, used to bound the CAGR window.
const TRADING_DAYS_PER_YEAR: usize = 252;

/// Percentage change of `date`'s close against the prior bar's close.
/// The series' first bar is 0.0 by convention; an absent date or a
/// zero/missing prior close is undefined.
pub fn day_over_day_change(series: &CanonicalSeries, date: NaiveDate) -> Option<f64> {
    let i = series.index_of(date)?;
    if i == 0 {
        return Some(0.0);
    }
    let curr = series.bars[i].close?;
    let prev = series.bars[i - 1].close?;
    if prev == 0.0 {
        return None;
    }
    Some((curr - prev) / prev * 100.0)
}

/// Per-bar percentage change against the prior close, aligned with the
/// series. The first element is 0.0 by convention, not undefined.
pub fn change_series(series: &CanonicalSeries) -> IndicatorSeries {
    series
        .bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                return Some(0.0);
            }
            let curr = bar.close?;
            let prev = series.bars[i - 1].close?;
            if prev == 0.0 {
                return None;
            }
            Some((curr - prev) / prev * 100.0)
        })
        .collect()
}

/// Return from the first close on or after January 1 of the current year to
/// the last close. Undefined when no bar falls within the year.
pub fn year_to_date_return(series: &CanonicalSeries) -> Option<f64> {
    year_return(series, Utc::now().date_naive().year())
}

fn year_return(series: &CanonicalSeries, year: i32) -> Option<f64> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let in_year: Vec<_> = series.bars.iter().filter(|b| b.date >= jan1).collect();
    let start = in_year.first()?.close?;
    let end = in_year.last()?.close?;
    if start == 0.0 {
        return None;
    }
    Some((end - start) / start * 100.0)
}

/// Compound annual growth rate over a trailing window of roughly `years`
/// (bounded at `years * 252` bars), annualized on the actual calendar span
/// between the window's endpoints.
pub fn cagr(series: &CanonicalSeries, years: usize) -> Option<f64> {
    let last = series.len().checked_sub(1)?;
    let start_idx = last.saturating_sub(years * TRADING_DAYS_PER_YEAR);
    let start_bar = &series.bars[start_idx];
    let end_bar = &series.bars[last];

    let start = start_bar.close?;
    let end = end_bar.close?;
    if start == 0.0 {
        return None;
    }
    let days = (end_bar.date - start_bar.date).num_days() as f64;
    if days <= 0.0 {
        return None;
    }
    let periods = days / 365.25;
    Some(((end / start).powf(1.0 / periods) - 1.0) * 100.0)
}
