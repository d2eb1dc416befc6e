//! Configuration types for extraction.

use serde::{Deserialize, Serialize};

/// Configuration for the merge/rank/cap step of the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Records scoring below this are discarded.
    ///
    /// Default: 30.
    pub min_confidence: u8,

    /// Maximum records returned per extraction.
    ///
    /// Default: 15.
    pub max_results: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 30,
            max_results: 15,
        }
    }
}

impl ExtractionConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum confidence threshold.
    pub fn with_min_confidence(mut self, min_confidence: u8) -> Self {
        self.min_confidence = min_confidence.min(100);
        self
    }

    /// Set the maximum number of returned records.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}
