// Best-effort scrape of the labeled summary block on a quote page
// (Open, Prev Close, High, Low, ...). Missing labels are simply absent.
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

const SNAPSHOT_LABELS: &[&str] = &[
    "Open",
    "Prev Close",
    "Close",
    "High",
    "Low",
    "Volume",
    "Market Cap",
    "P/E",
];

/// Walks the document for elements whose own text is one of the known
/// summary labels and pairs each with the text of its following sibling
/// (or, failing that, the remainder of its parent's text).
pub fn parse_snapshot(html: &str) -> BTreeMap<String, String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("td, th, div, span, li, dt").unwrap();
    let mut out = BTreeMap::new();

    for element in document.select(&selector) {
        let text = own_text(element);
        let Some(label) = SNAPSHOT_LABELS
            .iter()
            .find(|l| text.eq_ignore_ascii_case(l))
        else {
            continue;
        };
        if out.contains_key(*label) {
            continue;
        }
        if let Some(value) = sibling_value(element) {
            out.insert(label.to_string(), value);
        }
    }
    out
}

fn own_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn sibling_value(element: ElementRef<'_>) -> Option<String> {
    let sibling = element
        .next_siblings()
        .find_map(ElementRef::wrap)
        .map(own_text)
        .filter(|s| !s.is_empty());
    if sibling.is_some() {
        return sibling;
    }
    // No sibling: fall back to whatever the parent holds beyond the label.
    let parent = element.parent().and_then(ElementRef::wrap)?;
    let full = own_text(parent);
    let label = own_text(element);
    let rest = full.replace(&label, "");
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_cells_pair_with_their_siblings() {
        let html = "<table><tr><td>Open</td><td>3,500.00</td></tr>\
                    <tr><td>Prev Close</td><td>3,480.10</td></tr>\
                    <tr><td>P/E</td><td>28.4</td></tr></table>";
        let snapshot = parse_snapshot(html);
        assert_eq!(snapshot.get("Open").map(String::as_str), Some("3,500.00"));
        assert_eq!(
            snapshot.get("Prev Close").map(String::as_str),
            Some("3,480.10")
        );
        assert_eq!(snapshot.get("P/E").map(String::as_str), Some("28.4"));
        assert!(!snapshot.contains_key("Volume"));
    }

    #[test]
    fn first_occurrence_of_a_label_wins() {
        let html = "<div><span>High</span><span>110</span></div>\
                    <div><span>High</span><span>999</span></div>";
        let snapshot = parse_snapshot(html);
        assert_eq!(snapshot.get("High").map(String::as_str), Some("110"));
    }

    #[test]
    fn missing_block_yields_empty_map() {
        assert!(parse_snapshot("<html><body><p>nothing here</p></body></html>").is_empty());
    }
}
