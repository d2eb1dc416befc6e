//! Extraction pipeline - the core of the library.
//!
//! Three independent strategies produce candidates from the same parsed
//! document:
//! - Line patterns over the visible body text
//! - Structural containers (blocks, list items, table rows, card classes)
//! - A fixed set of targeted queries
//!
//! Their outputs feed one deterministic merge step: dedup by identity key
//! (first strategy wins), score, threshold, rank, cap.

pub mod extract;
pub mod fields;
pub mod line;
pub mod merge;
pub mod patterns;
pub mod scoring;
pub mod selectors;
pub mod structural;
pub mod text;

pub use extract::Extractor;
pub use merge::merge_candidates;
pub use scoring::confidence;
pub use selectors::TargetedQuery;
