//! Key-value store capability.
//!
//! The subset of Redis semantics the seen-set and the execution stats need:
//! strings with expiry, lists, hashes. Indices follow Redis conventions
//! (inclusive ranges, negative indices count from the end).

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::KvResult;

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Get a string value.
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    /// Set a string value that expires after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> KvResult<()>;

    /// All live keys starting with `prefix`.
    async fn keys_by_prefix(&self, prefix: &str) -> KvResult<Vec<String>>;

    /// Delete keys, returning how many existed.
    async fn delete(&self, keys: &[String]) -> KvResult<usize>;

    /// Push onto the head of a list, returning the new length.
    async fn list_push(&self, key: &str, value: &str) -> KvResult<usize>;

    /// Elements `start..=stop` of a list.
    async fn list_range(&self, key: &str, start: isize, stop: isize) -> KvResult<Vec<String>>;

    /// Keep only elements `start..=stop` of a list.
    async fn list_trim(&self, key: &str, start: isize, stop: isize) -> KvResult<()>;

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> KvResult<()>;

    async fn hash_get_all(&self, key: &str) -> KvResult<HashMap<String, String>>;

    /// Add `delta` to an integer hash field, returning the new value.
    async fn hash_increment_by(&self, key: &str, field: &str, delta: i64) -> KvResult<i64>;

    /// Set a key's expiry. Returns false if the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> KvResult<bool>;

    /// Short backend name for status reporting.
    fn backend(&self) -> &'static str;
}
