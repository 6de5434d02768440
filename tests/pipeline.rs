// End-to-end pipeline: HTML document -> table extraction -> normalization ->
// analytics, plus the payload path, exercised through the public API only.
use chrono::NaiveDate;
use tickline::{
    CanonicalSeries, PriceField, SeriesPayload, TableExtractor, bollinger_bands, cagr,
    change_series, correlate, day_over_day_change, macd, moving_average, normalize_payload,
    normalize_table, rsi,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// A quote page the way the portal renders it: navigation cruft first, the
/// history table (newest row first) buried behind it.
fn quote_page() -> String {
    let mut html = String::from(
        "<html><body>\
         <table><tr><td>Home</td><td>Markets</td></tr></table>\
         <table><tr><th>Date</th><th>Open Price</th><th>High Price</th>\
         <th>Low Price</th><th>Close Price</th><th>Volume</th></tr>",
    );
    let rows = [
        ("09-02-2024", "104.0", "109.0", "103.0", "108.0", "1,400"),
        ("08-02-2024", "103.0", "108.0", "102.0", "104.0", "1,300"),
        ("07-02-2024", "102.0", "107.0", "101.0", "103.5", "1,200"),
        ("06-02-2024", "101.0", "106.0", "100.0", "102.0", "1,100"),
        ("05-02-2024", "100.0", "105.0", "99.0", "101.0", "1,000"),
    ];
    for (date, open, high, low, close, volume) in rows {
        html.push_str(&format!(
            "<tr><td>{date}</td><td>{open}</td><td>{high}</td>\
             <td>{low}</td><td>{close}</td><td>{volume}</td></tr>"
        ));
    }
    html.push_str("</table></body></html>");
    html
}

fn scraped_series() -> CanonicalSeries {
    let table = TableExtractor::new().extract(&quote_page());
    normalize_table(&table)
}

#[test]
fn scraped_page_becomes_an_ascending_canonical_series() {
    let series = scraped_series();
    assert_eq!(series.len(), 5);
    assert!(series.bars.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(series.bars[0].date, d(2024, 2, 5));
    assert_eq!(series.bars[0].close, Some(101.0));
    assert_eq!(series.bars[4].volume, Some(1400.0));
}

#[test]
fn analytics_hold_their_edge_conventions_on_scraped_data() {
    let series = scraped_series();

    let changes = change_series(&series);
    assert_eq!(changes.len(), series.len());
    assert_eq!(changes[0], Some(0.0));
    assert_eq!(
        day_over_day_change(&series, series.bars[0].date),
        Some(0.0)
    );

    let sma = moving_average(&series, 3, PriceField::Close);
    assert_eq!(sma.len(), series.len());
    assert!(sma[..2].iter().all(Option::is_none));
    assert!(sma[2..].iter().all(Option::is_some));

    for value in rsi(&series, 3, PriceField::Close).into_iter().flatten() {
        assert!((0.0..=100.0).contains(&value));
    }

    let (line, signal) = macd(&series, 2, 4, 3, PriceField::Close);
    assert_eq!(line.len(), series.len());
    assert_eq!(signal.len(), series.len());

    let (upper, mid, lower) = bollinger_bands(&series, 3, PriceField::Close);
    for i in 0..series.len() {
        if let (Some(u), Some(m), Some(l)) = (upper[i], mid[i], lower[i]) {
            assert!(u >= m && m >= l);
        }
    }
}

#[test]
fn payload_and_scrape_paths_agree_on_the_schema() {
    let payload = SeriesPayload {
        t: vec![1_707_091_200, 1_707_177_600], // 2024-02-05, 2024-02-06 UTC
        o: Some(vec![100.0, 101.0]),
        h: Some(vec![105.0, 106.0]),
        l: Some(vec![99.0, 100.0]),
        c: Some(vec![101.0, 102.0]),
        v: Some(vec![1000.0, 1100.0]),
    };
    let from_payload = normalize_payload(&payload);
    let from_scrape = scraped_series().range(d(2024, 2, 5), d(2024, 2, 6));
    assert_eq!(from_payload, from_scrape);
}

#[test]
fn correlation_and_cagr_over_the_scraped_series() {
    let series = scraped_series();
    let r = correlate(&series, &series).unwrap();
    assert!((r - 1.0).abs() < 1e-12);

    // 101 -> 108 over 4 calendar days annualizes to a huge positive rate.
    let rate = cagr(&series, 1).unwrap();
    assert!(rate > 0.0);
}
