//! Record types - one candidate token launch pulled out of a page.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::pipeline::scoring;

/// Maximum links kept per record.
pub const MAX_LINKS: usize = 3;

/// Maximum characters of source text kept on a record.
pub const MAX_EXCERPT_CHARS: usize = 200;

/// Display name used when none can be derived.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Identity-key stand-in for records without an address.
pub const NO_ADDRESS: &str = "none";

/// Market status inferred from keywords around a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Pumping,
    Dumping,
    New,
}

impl RecordStatus {
    /// Infer a status from text.
    ///
    /// Returns the status plus whether a status keyword was actually present
    /// (`New` is also the fallback when nothing matched).
    pub fn detect(text: &str) -> (Self, bool) {
        let detected = text.contains("PUMP") || text.contains("DUMP") || text.contains("NEW");
        let status = if text.contains("PUMP") {
            Self::Pumping
        } else if text.contains("DUMP") {
            Self::Dumping
        } else {
            Self::New
        };
        (status, detected)
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Pumping => "🚀",
            Self::Dumping => "📉",
            Self::New => "🆕",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pumping => "PUMPING",
            Self::Dumping => "DUMPING",
            Self::New => "NEW",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.glyph(), self.label())
    }
}

/// Which extraction strategy produced a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordSource {
    /// Line-by-line scan of the page text
    LinePattern,
    /// Block/list/table container walk
    Structural,
    /// One of the fixed targeted queries, tagged with the query
    Selector(String),
    /// Built-in development fixture
    Fixture,
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinePattern => f.write_str("line_pattern"),
            Self::Structural => f.write_str("structural"),
            Self::Selector(query) => write!(f, "selector:{}", query),
            Self::Fixture => f.write_str("fixture"),
        }
    }
}

impl Serialize for RecordSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A candidate token launch.
///
/// Construct with [`Record::new`], which refuses anything without a valid
/// symbol, so a `Record` value always carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Uppercase ticker, 2-6 ASCII letters
    pub symbol: String,

    /// Best-effort display name (cosmetic, not part of identity)
    pub name: String,

    /// Truncated contract address such as `F45yyX...`
    pub address: Option<String>,

    pub status: RecordStatus,

    /// Whether a PUMP/DUMP/NEW keyword was present in the source text
    pub status_detected: bool,

    /// Up to [`MAX_LINKS`] unique URLs in first-seen order
    pub links: Vec<String>,

    /// Source text the record came from, at most [`MAX_EXCERPT_CHARS`] chars
    pub raw_excerpt: String,

    pub source: RecordSource,

    /// Heuristic quality score in 0..=100
    pub confidence: u8,
}

impl Record {
    /// Create a record for `symbol`, or `None` if the symbol is not 2-6
    /// uppercase ASCII letters.
    pub fn new(symbol: impl Into<String>, source: RecordSource) -> Option<Self> {
        let symbol = symbol.into();
        if !is_valid_symbol(&symbol) {
            return None;
        }

        let mut record = Self {
            symbol,
            name: UNKNOWN_NAME.to_string(),
            address: None,
            status: RecordStatus::New,
            status_detected: false,
            links: Vec::new(),
            raw_excerpt: String::new(),
            source,
            confidence: 0,
        };
        record.rescore();
        Some(record)
    }

    /// Set the display name, falling back to [`UNKNOWN_NAME`] when it is too
    /// short or indistinguishable from the symbol.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.chars().count() < 2 || name.eq_ignore_ascii_case(&self.symbol) {
            UNKNOWN_NAME.to_string()
        } else {
            name
        };
        self
    }

    pub fn with_address(mut self, address: Option<String>) -> Self {
        self.address = address;
        self.rescore();
        self
    }

    pub fn with_status(mut self, status: RecordStatus, detected: bool) -> Self {
        self.status = status;
        self.status_detected = detected;
        self.rescore();
        self
    }

    /// Replace the links (deduplicated, capped).
    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.links.clear();
        self.extend_links(links);
        self
    }

    /// Append links after the existing ones (deduplicated, capped).
    pub fn extend_links<I, S>(&mut self, links: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for link in links {
            if self.links.len() >= MAX_LINKS {
                break;
            }
            let link = link.into();
            if !self.links.contains(&link) {
                self.links.push(link);
            }
        }
        self.rescore();
    }

    /// Keep the first [`MAX_EXCERPT_CHARS`] characters of `text`.
    pub fn with_excerpt(mut self, text: &str) -> Self {
        self.raw_excerpt = text.chars().take(MAX_EXCERPT_CHARS).collect();
        self
    }

    pub fn with_source(mut self, source: RecordSource) -> Self {
        self.source = source;
        self
    }

    /// `symbol:address`, or `symbol:none` without an address.
    pub fn identity_key(&self) -> String {
        format!(
            "{}:{}",
            self.symbol,
            self.address.as_deref().unwrap_or(NO_ADDRESS)
        )
    }

    /// Recompute `confidence` from the current fields.
    pub fn rescore(&mut self) {
        self.confidence = scoring::confidence(self);
    }
}

/// 2-6 uppercase ASCII letters.
pub fn is_valid_symbol(symbol: &str) -> bool {
    (2..=6).contains(&symbol.len()) && symbol.bytes().all(|b| b.is_ascii_uppercase())
}

/// 4-8 ASCII alphanumerics followed by `...`.
pub fn is_well_formed_address(address: &str) -> bool {
    address
        .strip_suffix("...")
        .map(|head| (4..=8).contains(&head.len()) && head.bytes().all(|b| b.is_ascii_alphanumeric()))
        .unwrap_or(false)
}
