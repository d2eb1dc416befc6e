//! The extractor: one parse, three strategies, one merge.

use scraper::Html;
use tracing::debug;

use super::{line, merge::merge_candidates, selectors, structural};
use crate::types::{config::ExtractionConfig, record::Record};

/// Heuristic record extractor.
///
/// Pure: the same input always yields the same ordered output.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractionConfig,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract ranked records from raw HTML (or plain text).
    ///
    /// Never fails; unusable input gives an empty list.
    pub fn extract(&self, content: &str) -> Vec<Record> {
        if content.trim().is_empty() {
            return Vec::new();
        }

        let document = Html::parse_document(content);

        let from_lines = line::extract(&document);
        let from_structure = structural::extract(&document);
        let from_selectors = selectors::extract(&document);

        debug!(
            line_pattern = from_lines.len(),
            structural = from_structure.len(),
            selector = from_selectors.len(),
            "Extraction candidates"
        );

        let records = merge_candidates(
            from_lines
                .into_iter()
                .chain(from_structure)
                .chain(from_selectors),
            &self.config,
        );

        debug!(records = records.len(), "Extraction complete");
        records
    }
}
