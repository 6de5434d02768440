// Cell-level parse helpers shared by the normalizer.
use chrono::{DateTime, NaiveDate};

/// Coerces a table cell to a number: drops thousands separators and any
/// character outside `[0-9.-]`, then parses. Unparsable cells are `None`,
/// never zero.
pub fn clean_numeric(cell: &str) -> Option<f64> {
    let stripped: String = cell
        .replace(',', "")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if stripped.is_empty() {
        return None;
    }
    stripped.parse::<f64>().ok()
}

/// Day-first formats seen on scraped quote pages, tried in order. ISO last
/// so unambiguous `yyyy-mm-dd` cells still parse.
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d %b, %Y",
    "%Y-%m-%d",
];

/// Parses an HTML-derived date cell with a day-first convention.
pub fn parse_date_day_first(cell: &str) -> Option<NaiveDate> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    DAY_FIRST_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Converts epoch seconds to a calendar date, interpreted as UTC.
pub fn epoch_to_date(secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_numeric_handles_portal_formatting() {
        assert_eq!(clean_numeric("1,234.50"), Some(1234.5));
        assert_eq!(clean_numeric("₹ 3,500.00"), Some(3500.0));
        assert_eq!(clean_numeric("-2.5%"), Some(-2.5));
        assert_eq!(clean_numeric(""), None);
        assert_eq!(clean_numeric("n/a"), None);
        assert_eq!(clean_numeric("--"), None);
    }

    #[test]
    fn date_cells_parse_day_first() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(parse_date_day_first("01-02-2024"), Some(expected));
        assert_eq!(parse_date_day_first("01/02/2024"), Some(expected));
        assert_eq!(parse_date_day_first("01 Feb 2024"), Some(expected));
        assert_eq!(parse_date_day_first("2024-02-01"), Some(expected));
        assert_eq!(parse_date_day_first("not a date"), None);
    }

    #[test]
    fn epoch_seconds_become_utc_dates() {
        // 2023-11-14T22:13:20Z
        assert_eq!(
            epoch_to_date(1_700_000_000),
            NaiveDate::from_ymd_opt(2023, 11, 14)
        );
    }
}
