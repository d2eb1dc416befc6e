//! Testing utilities including mock implementations.
//!
//! Useful for testing applications built on the extraction library
//! without a real clock or a reachable key-value backend.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::{KvError, KvResult};
use crate::traits::{clock::Clock, kv::KvStore};
use crate::types::record::{Record, RecordSource, RecordStatus};

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += chrono::Duration::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A key-value store where every operation fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingKv;

fn unavailable<T>() -> KvResult<T> {
    Err(KvError::Unavailable("mock backend is down".to_string()))
}

#[async_trait]
impl KvStore for FailingKv {
    async fn get(&self, _key: &str) -> KvResult<Option<String>> {
        unavailable()
    }

    async fn set_with_ttl(&self, _key: &str, _value: &str, _ttl: Duration) -> KvResult<()> {
        unavailable()
    }

    async fn keys_by_prefix(&self, _prefix: &str) -> KvResult<Vec<String>> {
        unavailable()
    }

    async fn delete(&self, _keys: &[String]) -> KvResult<usize> {
        unavailable()
    }

    async fn list_push(&self, _key: &str, _value: &str) -> KvResult<usize> {
        unavailable()
    }

    async fn list_range(&self, _key: &str, _start: isize, _stop: isize) -> KvResult<Vec<String>> {
        unavailable()
    }

    async fn list_trim(&self, _key: &str, _start: isize, _stop: isize) -> KvResult<()> {
        unavailable()
    }

    async fn hash_set(&self, _key: &str, _field: &str, _value: &str) -> KvResult<()> {
        unavailable()
    }

    async fn hash_get_all(&self, _key: &str) -> KvResult<HashMap<String, String>> {
        unavailable()
    }

    async fn hash_increment_by(&self, _key: &str, _field: &str, _delta: i64) -> KvResult<i64> {
        unavailable()
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> KvResult<bool> {
        unavailable()
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// A detected-NEW record for `symbol`, optionally with an address.
///
/// Panics if `symbol` is not a valid ticker.
pub fn sample_record(symbol: &str, address: Option<&str>) -> Record {
    Record::new(symbol, RecordSource::LinePattern)
        .unwrap_or_else(|| panic!("invalid sample symbol: {}", symbol))
        .with_name(format!("{} Coin", symbol))
        .with_address(address.map(str::to_string))
        .with_status(RecordStatus::New, true)
        .with_excerpt(&format!("{} Coin NEW", symbol))
}
