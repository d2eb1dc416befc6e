//! Seen-set backends.
//!
//! Members are identity keys (`SYMBOL:address`). Each is stored with the
//! time it was notified and when it stops counting as seen.

pub mod kv;
pub mod memory;

pub use kv::KvSeenSet;
pub use memory::MemorySeenSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::traits::clock::expiry_after;

/// One seen-set member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenEntry {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub sent_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl SeenEntry {
    pub fn new(sent_at: DateTime<Utc>, retention: Duration) -> Self {
        Self {
            sent_at,
            expires_at: expiry_after(sent_at, retention),
        }
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }
}
