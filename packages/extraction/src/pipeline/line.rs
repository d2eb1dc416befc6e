//! Line-pattern strategy.

use scraper::Html;

use super::fields::record_from_text;
use super::patterns::is_record_line;
use super::text::body_text;
use crate::types::record::{Record, RecordSource};

/// Lines this short carry no usable record.
const MIN_LINE_CHARS: usize = 10;

pub fn extract(document: &Html) -> Vec<Record> {
    body_text(document)
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_LINE_CHARS)
        .filter(|line| is_record_line(line))
        .filter_map(|line| record_from_text(line, RecordSource::LinePattern))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_record_per_matching_line() {
        let document = Html::parse_document(
            "FPM Funny Pants-Man FPM_PUMP DUMP\nnothing to see on this line\nXYZ Xylo coin NEW listing\nAB NEW",
        );
        let records = extract(&document);

        let symbols: Vec<&str> = records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["FPM", "XYZ"]);
        assert!(records.iter().all(|r| r.source == RecordSource::LinePattern));
    }
}
