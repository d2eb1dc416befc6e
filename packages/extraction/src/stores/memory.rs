//! In-memory key-value store for testing and development.
//!
//! Mirrors the Redis semantics of [`KvStore`] closely enough that the stats
//! and seen-set code behave the same against it. Expired keys are dropped
//! lazily on access. Data is lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::{KvError, KvResult};
use crate::traits::{
    clock::{expiry_after, Clock, SystemClock},
    kv::KvStore,
};

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    List(VecDeque<String>),
    Hash(HashMap<String, String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

pub struct MemoryKv {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Use `clock` for expiry decisions.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.lock().values().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The live entry at `key`, evicting it first if it has expired.
    fn live<'a>(
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
        now: DateTime<Utc>,
    ) -> Option<&'a mut Entry> {
        if entries.get(key).is_some_and(|e| !e.is_live(now)) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }
}

/// Resolve a Redis-style inclusive range against a length.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if len == 0 || start > stop || start >= len {
        None
    } else {
        Some((start as usize, stop as usize))
    }
}

fn wrong_type(key: &str) -> KvError {
    KvError::WrongType {
        key: key.to_string(),
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let now = self.clock.now();
        let mut entries = self.lock();
        match Self::live(&mut entries, key, now) {
            None => Ok(None),
            Some(Entry {
                value: Value::Str(value),
                ..
            }) => Ok(Some(value.clone())),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> KvResult<()> {
        let now = self.clock.now();
        self.lock().insert(
            key.to_string(),
            Entry {
                value: Value::Str(value.to_string()),
                expires_at: Some(expiry_after(now, ttl)),
            },
        );
        Ok(())
    }

    async fn keys_by_prefix(&self, prefix: &str) -> KvResult<Vec<String>> {
        let now = self.clock.now();
        let mut keys: Vec<String> = self
            .lock()
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && entry.is_live(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn delete(&self, keys: &[String]) -> KvResult<usize> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let mut removed = 0;
        for key in keys {
            if let Some(entry) = entries.remove(key) {
                if entry.is_live(now) {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    async fn list_push(&self, key: &str, value: &str) -> KvResult<usize> {
        let now = self.clock.now();
        let mut entries = self.lock();
        if Self::live(&mut entries, key, now).is_none() {
            entries.insert(
                key.to_string(),
                Entry {
                    value: Value::List(VecDeque::new()),
                    expires_at: None,
                },
            );
        }
        match entries.get_mut(key) {
            Some(Entry {
                value: Value::List(list),
                ..
            }) => {
                list.push_front(value.to_string());
                Ok(list.len())
            }
            _ => Err(wrong_type(key)),
        }
    }

    async fn list_range(&self, key: &str, start: isize, stop: isize) -> KvResult<Vec<String>> {
        let now = self.clock.now();
        let mut entries = self.lock();
        match Self::live(&mut entries, key, now) {
            None => Ok(Vec::new()),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => Ok(match resolve_range(list.len(), start, stop) {
                Some((from, to)) => list.range(from..=to).cloned().collect(),
                None => Vec::new(),
            }),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn list_trim(&self, key: &str, start: isize, stop: isize) -> KvResult<()> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let emptied = match Self::live(&mut entries, key, now) {
            None => return Ok(()),
            Some(Entry {
                value: Value::List(list),
                ..
            }) => {
                match resolve_range(list.len(), start, stop) {
                    Some((from, to)) => {
                        list.truncate(to + 1);
                        list.drain(..from);
                    }
                    None => list.clear(),
                }
                list.is_empty()
            }
            Some(_) => return Err(wrong_type(key)),
        };
        if emptied {
            entries.remove(key);
        }
        Ok(())
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> KvResult<()> {
        let now = self.clock.now();
        let mut entries = self.lock();
        if Self::live(&mut entries, key, now).is_none() {
            entries.insert(
                key.to_string(),
                Entry {
                    value: Value::Hash(HashMap::new()),
                    expires_at: None,
                },
            );
        }
        match entries.get_mut(key) {
            Some(Entry {
                value: Value::Hash(hash),
                ..
            }) => {
                hash.insert(field.to_string(), value.to_string());
                Ok(())
            }
            _ => Err(wrong_type(key)),
        }
    }

    async fn hash_get_all(&self, key: &str) -> KvResult<HashMap<String, String>> {
        let now = self.clock.now();
        let mut entries = self.lock();
        match Self::live(&mut entries, key, now) {
            None => Ok(HashMap::new()),
            Some(Entry {
                value: Value::Hash(hash),
                ..
            }) => Ok(hash.clone()),
            Some(_) => Err(wrong_type(key)),
        }
    }

    async fn hash_increment_by(&self, key: &str, field: &str, delta: i64) -> KvResult<i64> {
        let now = self.clock.now();
        let mut entries = self.lock();
        if Self::live(&mut entries, key, now).is_none() {
            entries.insert(
                key.to_string(),
                Entry {
                    value: Value::Hash(HashMap::new()),
                    expires_at: None,
                },
            );
        }
        match entries.get_mut(key) {
            Some(Entry {
                value: Value::Hash(hash),
                ..
            }) => {
                let current = match hash.get(field) {
                    Some(raw) => raw.parse::<i64>().map_err(|_| KvError::Command {
                        command: "HINCRBY".to_string(),
                        message: format!("hash value at {}.{} is not an integer", key, field),
                    })?,
                    None => 0,
                };
                let next = current + delta;
                hash.insert(field.to_string(), next.to_string());
                Ok(next)
            }
            _ => Err(wrong_type(key)),
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> KvResult<bool> {
        let now = self.clock.now();
        let mut entries = self.lock();
        match Self::live(&mut entries, key, now) {
            None => Ok(false),
            Some(entry) => {
                entry.expires_at = Some(expiry_after(now, ttl));
                Ok(true)
            }
        }
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
