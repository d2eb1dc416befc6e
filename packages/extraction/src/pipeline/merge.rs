//! Merge strategy outputs into the final result list.

use indexmap::IndexMap;

use crate::types::{config::ExtractionConfig, record::Record};

/// Deduplicate by identity key (first occurrence wins), drop low-confidence
/// records, sort by confidence descending and cap the result size.
pub fn merge_candidates(
    candidates: impl IntoIterator<Item = Record>,
    config: &ExtractionConfig,
) -> Vec<Record> {
    let mut unique: IndexMap<String, Record> = IndexMap::new();
    for record in candidates {
        unique.entry(record.identity_key()).or_insert(record);
    }

    let mut records: Vec<Record> = unique
        .into_values()
        .map(|mut record| {
            record.rescore();
            record
        })
        .filter(|record| record.confidence >= config.min_confidence)
        .collect();

    // Stable, so ties keep strategy order
    records.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    records.truncate(config.max_results);
    records
}
