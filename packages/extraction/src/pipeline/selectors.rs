//! Targeted-selector strategy.
//!
//! A fixed set of queries. CSS in `scraper` has no `:has`/`:contains`, so
//! each query is a plain selector plus a predicate over the matched element.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use super::fields::record_from_text;
use super::patterns::is_record_line;
use super::text::visible_text;
use crate::types::record::{Record, RecordSource};

lazy_static! {
    static ref NESTED_DIV: Selector =
        Selector::parse("div > div").expect("static nested div selector is valid");
    static ref TABLE_ROW: Selector = Selector::parse("tr").expect("static tr selector is valid");
    static ref TABLE_CELL: Selector = Selector::parse("td").expect("static td selector is valid");
    static ref DIV: Selector = Selector::parse("div").expect("static div selector is valid");
    static ref SPAN: Selector = Selector::parse("span").expect("static span selector is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetedQuery {
    NestedContainer,
    TableRow,
    ContainsPump,
    ContainsNew,
    AddressSpan,
}

impl TargetedQuery {
    /// Queries in the order they run.
    pub const ALL: [TargetedQuery; 5] = [
        Self::NestedContainer,
        Self::TableRow,
        Self::ContainsPump,
        Self::ContainsNew,
        Self::AddressSpan,
    ];

    /// Query as written in a record's source tag.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NestedContainer => "div > div",
            Self::TableRow => "tr:has(td)",
            Self::ContainsPump => r#"div:contains("PUMP")"#,
            Self::ContainsNew => r#"div:contains("NEW")"#,
            Self::AddressSpan => r#"span:contains("...")"#,
        }
    }

    fn selector(&self) -> &'static Selector {
        match self {
            Self::NestedContainer => &NESTED_DIV,
            Self::TableRow => &TABLE_ROW,
            Self::ContainsPump | Self::ContainsNew => &DIV,
            Self::AddressSpan => &SPAN,
        }
    }

    fn accepts(&self, element: ElementRef<'_>, text: &str) -> bool {
        match self {
            Self::NestedContainer => true,
            Self::TableRow => element.select(&TABLE_CELL).next().is_some(),
            Self::ContainsPump => text.contains("PUMP"),
            Self::ContainsNew => text.contains("NEW"),
            Self::AddressSpan => text.contains("..."),
        }
    }

    /// Records from every element this query matches.
    pub fn run(&self, document: &Html) -> Vec<Record> {
        document
            .select(self.selector())
            .filter_map(|element| {
                let text = visible_text(element);
                if !self.accepts(element, &text) {
                    return None;
                }
                let trimmed = text.trim();
                if !is_record_line(trimmed) {
                    return None;
                }
                record_from_text(trimmed, RecordSource::Selector(self.label().to_string()))
            })
            .collect()
    }
}

pub fn extract(document: &Html) -> Vec<Record> {
    TargetedQuery::ALL
        .iter()
        .flat_map(|query| query.run(document))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_div_is_tagged() {
        let document = Html::parse_document("<div><div>AB NEW</div></div>");
        let records = extract(&document);

        assert!(!records.is_empty());
        assert_eq!(
            records[0].source,
            RecordSource::Selector("div > div".to_string())
        );
        assert_eq!(records[0].symbol, "AB");
    }

    #[test]
    fn test_row_without_cells_is_skipped() {
        let records =
            TargetedQuery::TableRow.run(&Html::parse_document("<table><tr><th>XYZ NEW</th></tr></table>"));
        assert!(records.is_empty());

        let records =
            TargetedQuery::TableRow.run(&Html::parse_document("<table><tr><td>XYZ NEW</td></tr></table>"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source.to_string(), "selector:tr:has(td)");
    }

    #[test]
    fn test_address_span() {
        let records = TargetedQuery::AddressSpan
            .run(&Html::parse_document("<span>QRS F45yyX...</span><span>plain text</span>"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address.as_deref(), Some("F45yyX..."));
    }
}
