//! Field extraction from a run of text.
//!
//! Every strategy ends up here: given some text (a line, a container plus
//! its parent's context, a query match) pull out symbol, address, status,
//! name and links, and build a [`Record`] or nothing.

use regex::Regex;

use super::patterns::{ADDRESS_REGEX, LINK_REGEX, SYMBOL_REGEX};
use crate::types::record::{Record, RecordSource, RecordStatus};

/// Build a record from `text`, or `None` when no ticker can be found.
pub fn record_from_text(text: &str, source: RecordSource) -> Option<Record> {
    let clean = collapse_whitespace(text);

    let symbol = SYMBOL_REGEX.captures(&clean)?.get(1)?.as_str().to_string();

    let address = ADDRESS_REGEX
        .captures(&clean)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("{}...", m.as_str()));

    let (status, detected) = RecordStatus::detect(&clean);
    let name = derive_name(&clean, &symbol).unwrap_or_default();
    let links: Vec<String> = LINK_REGEX
        .find_iter(&clean)
        .map(|m| m.as_str().to_string())
        .collect();

    Record::new(symbol, source).map(|record| {
        record
            .with_name(name)
            .with_address(address)
            .with_status(status, detected)
            .with_links(links)
            .with_excerpt(&clean)
    })
}

/// Display name heuristic.
///
/// Prefers the word right before the ticker; when that is missing, shorter
/// than two characters or the ticker itself, uses the word right after it.
fn derive_name(clean: &str, symbol: &str) -> Option<String> {
    let words: Vec<&str> = clean.split(' ').collect();

    let preceding = words
        .iter()
        .position(|word| *word == symbol)
        .filter(|&index| index > 0)
        .map(|index| words[index - 1])
        .filter(|word| word.chars().count() >= 2 && !word.eq_ignore_ascii_case(symbol));

    preceding
        .map(str::to_string)
        .or_else(|| following_word(clean, symbol))
        .map(|name| capitalize(&name))
}

fn following_word(clean: &str, symbol: &str) -> Option<String> {
    let pattern = format!(r"\b{}\s+([A-Za-z\-]+)\s+", regex::escape(symbol));
    let regex = Regex::new(&pattern).ok()?;
    regex
        .captures(clean)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First character uppercased, the rest lowercased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
