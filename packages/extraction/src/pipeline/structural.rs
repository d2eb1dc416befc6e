//! Structural strategy.
//!
//! Walks block, list, table and card-like containers. A container that
//! reads like a launch record is combined with a slice of its parent's
//! text (tickers and addresses often sit in sibling cells) and its
//! outbound anchors are attached as links.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use super::fields::record_from_text;
use super::patterns::{has_symbol, looks_like_record};
use super::text::{visible_segments, visible_text};
use crate::types::record::{Record, RecordSource};

/// Containers with less trimmed text than this are skipped.
const MIN_CONTAINER_CHARS: usize = 20;

/// How much of the parent's text is appended as context.
const PARENT_CONTEXT_CHARS: usize = 300;

lazy_static! {
    static ref CONTAINER_SELECTOR: Selector = Selector::parse(
        r#"div, section, article, tr, li, [class*="token"], [class*="card"], [class*="item"], [class*="pump"], [class*="new"]"#
    )
    .expect("static container CSS selector is valid");
    static ref ANCHOR_SELECTOR: Selector =
        Selector::parse("a[href]").expect("static anchor CSS selector is valid");
}

pub fn extract(document: &Html) -> Vec<Record> {
    document
        .select(&CONTAINER_SELECTOR)
        .filter_map(record_from_container)
        .collect()
}

fn record_from_container(container: ElementRef<'_>) -> Option<Record> {
    let text = visible_text(container);
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_CONTAINER_CHARS {
        return None;
    }
    if !looks_like_record(trimmed) || !has_symbol(trimmed) {
        return None;
    }

    let parent_context: String = container
        .parent()
        .and_then(ElementRef::wrap)
        .map(|parent| {
            visible_segments(parent)
                .flat_map(str::chars)
                .take(PARENT_CONTEXT_CHARS)
                .collect()
        })
        .unwrap_or_default();
    let combined = format!("{} {}", trimmed, parent_context);

    let mut record = record_from_text(&combined, RecordSource::Structural)?;
    record.extend_links(outbound_links(container));
    Some(record)
}

/// Absolute http(s) anchor targets inside `container`.
fn outbound_links(container: ElementRef<'_>) -> Vec<String> {
    container
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| href.starts_with("http://") || href.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_card() {
        let document = Html::parse_document(
            r#"<div class="token-card"><span>BONK</span> <span>Bonk Inu</span> <span>9xQeWvG8...</span> PUMP <a href="https://t.me/bonk">tg</a></div>"#,
        );
        let records = extract(&document);

        let record = records
            .iter()
            .find(|r| r.symbol == "BONK")
            .expect("card should yield a record");
        assert_eq!(record.address.as_deref(), Some("9xQeWvG8..."));
        assert_eq!(record.links, vec!["https://t.me/bonk"]);
        assert_eq!(record.source, RecordSource::Structural);
        assert_eq!(record.confidence, 100);
    }

    #[test]
    fn test_relative_links_are_ignored() {
        let document = Html::parse_document(
            r#"<li>XYZ Xylo token on solana NEW <a href="/token/xyz">more</a> <a href="mailto:x@y.z">mail</a></li>"#,
        );
        let records = extract(&document);

        assert_eq!(records.len(), 1);
        assert!(records[0].links.is_empty());
    }

    #[test]
    fn test_address_recovered_from_parent() {
        // Only the span is a container; the address sits beside it
        let document = Html::parse_document(
            r#"<p><span class="token-name">XYZ Xylo token listed NEW</span> <b>9xQeWvG8...</b></p>"#,
        );
        let records = extract(&document);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbol, "XYZ");
        assert_eq!(records[0].address.as_deref(), Some("9xQeWvG8..."));
        assert_eq!(records[0].identity_key(), "XYZ:9xQeWvG8...");
        assert_eq!(records[0].source, RecordSource::Structural);
    }

    #[test]
    fn test_parent_context_is_bounded() {
        let filler = "lorem ipsum ".repeat(40);
        let document = Html::parse_document(&format!(
            r#"<p><span class="token-name">XYZ Xylo token listed NEW</span> {} <b>9xQeWvG8...</b></p>"#,
            filler
        ));
        let records = extract(&document);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, None);
    }

    #[test]
    fn test_short_containers_are_skipped() {
        let document = Html::parse_document("<div>AB NEW</div>");
        assert!(extract(&document).is_empty());
    }
}
