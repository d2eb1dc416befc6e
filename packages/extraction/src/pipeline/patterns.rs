//! Text patterns shared by every strategy.

use lazy_static::lazy_static;
use regex::Regex;

/// Words that mark a line as launch-board content (matched case-insensitively).
pub const KEYWORDS: &[&str] = &[
    "PUMP", "DUMP", "NEW", "TOKEN", "SOLANA", "MEMECOIN", "COIN", "RESUSED", "TORK", "NAME", "URL",
];

lazy_static! {
    // Ticker: a standalone run of 2-6 capitals
    pub static ref SYMBOL_REGEX: Regex = Regex::new(r"\b([A-Z]{2,6})\b").unwrap();

    // Truncated contract address: 4-8 alphanumerics then "..." or a unicode ellipsis
    pub static ref ADDRESS_REGEX: Regex = Regex::new(r"([A-Za-z0-9]{4,8})(?:\.\.\.|…)").unwrap();

    pub static ref LINK_REGEX: Regex = Regex::new(r"https?://\S+").unwrap();

    static ref TWO_SYMBOLS_REGEX: Regex = Regex::new(r"\b[A-Z]{2,6}\b.*\b[A-Z]{2,6}\b").unwrap();

    // e.g. FPM_PUMP
    static ref SYMBOL_STATUS_REGEX: Regex = Regex::new(r"[A-Z]{2,6}_.*(PUMP|DUMP)").unwrap();
}

pub fn has_symbol(text: &str) -> bool {
    SYMBOL_REGEX.is_match(text)
}

pub fn has_address(text: &str) -> bool {
    ADDRESS_REGEX.is_match(text)
}

pub fn has_keyword(text: &str) -> bool {
    let upper = text.to_uppercase();
    KEYWORDS.iter().any(|keyword| upper.contains(keyword))
}

/// Line filter: a keyword or an address, plus a ticker.
pub fn is_record_line(text: &str) -> bool {
    (has_keyword(text) || has_address(text)) && has_symbol(text)
}

/// Container filter used by the structural strategy.
pub fn looks_like_record(text: &str) -> bool {
    if text.chars().count() < 10 {
        return false;
    }

    let upper = text.to_uppercase();

    let critical = (upper.contains("PUMP") && upper.contains("DUMP"))
        || upper.contains("NEW TOKENS")
        || upper.contains("RESUSED")
        || SYMBOL_STATUS_REGEX.is_match(&upper);

    let basic = upper.contains("TOKEN")
        || upper.contains("SOLANA")
        || has_address(text)
        || TWO_SYMBOLS_REGEX.is_match(text);

    critical || basic
}
