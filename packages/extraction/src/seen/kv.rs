//! Seen-set over a [`KvStore`].
//!
//! Each member is a string key `token:<identity>` holding a JSON
//! [`SeenEntry`], written with a server-side expiry.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::SeenEntry;
use crate::traits::{
    clock::{Clock, SystemClock},
    kv::KvStore,
    seen::SeenSet,
};

/// Namespace for seen-set keys in the shared store.
pub const KEY_PREFIX: &str = "token:";

pub struct KvSeenSet {
    kv: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
}

impl KvSeenSet {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn storage_key(identity_key: &str) -> String {
        format!("{}{}", KEY_PREFIX, identity_key)
    }
}

#[async_trait]
impl SeenSet for KvSeenSet {
    async fn is_member(&self, key: &str) -> bool {
        match self.kv.get(&Self::storage_key(key)).await {
            // Unparseable values still mark the key as taken
            Ok(Some(raw)) => serde_json::from_str::<SeenEntry>(&raw)
                .map(|entry| entry.is_live(self.clock.now()))
                .unwrap_or(true),
            Ok(None) => false,
            Err(e) => {
                warn!(key = %key, error = %e, "Seen-set lookup failed, treating as unseen");
                false
            }
        }
    }

    async fn mark_seen(&self, key: &str, retention: Duration) -> bool {
        let entry = SeenEntry::new(self.clock.now(), retention);
        let value = match serde_json::to_string(&entry) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode seen-set entry");
                return false;
            }
        };

        match self
            .kv
            .set_with_ttl(&Self::storage_key(key), &value, retention)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to mark record as seen");
                false
            }
        }
    }

    async fn count_members(&self) -> usize {
        match self.kv.keys_by_prefix(KEY_PREFIX).await {
            Ok(keys) => keys.len(),
            Err(e) => {
                warn!(error = %e, "Failed to count seen-set members");
                0
            }
        }
    }

    async fn clear(&self) -> bool {
        let keys = match self.kv.keys_by_prefix(KEY_PREFIX).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "Failed to list seen-set members");
                return false;
            }
        };

        match self.kv.delete(&keys).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Failed to clear seen-set");
                false
            }
        }
    }

    fn backend(&self) -> &'static str {
        self.kv.backend()
    }
}
