//! Confidence scoring.
//!
//! Additive over fixed-weight signals, capped at 100. Computed from a
//! record's own fields only.

use crate::types::record::{is_valid_symbol, is_well_formed_address, Record};

pub const SYMBOL_WEIGHT: u32 = 30;
pub const ADDRESS_WEIGHT: u32 = 40;
pub const STATUS_WEIGHT: u32 = 20;
pub const LINK_WEIGHT: u32 = 10;

pub fn confidence(record: &Record) -> u8 {
    let mut score = 0;

    if is_valid_symbol(&record.symbol) {
        score += SYMBOL_WEIGHT;
    }
    if record
        .address
        .as_deref()
        .is_some_and(is_well_formed_address)
    {
        score += ADDRESS_WEIGHT;
    }
    if record.status_detected {
        score += STATUS_WEIGHT;
    }
    if !record.links.is_empty() {
        score += LINK_WEIGHT;
    }

    score.min(100) as u8
}
