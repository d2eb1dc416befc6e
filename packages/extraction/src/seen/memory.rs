//! Bounded in-process seen-set.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::SeenEntry;
use crate::traits::{
    clock::{Clock, SystemClock},
    seen::SeenSet,
};

/// Hard cap on stored members.
pub const MAX_ENTRIES: usize = 1000;

/// Size the map is trimmed back to once the cap is exceeded.
pub const LOW_WATERMARK: usize = 500;

/// Insertion-ordered map of identity keys; oldest marks are evicted first.
///
/// Expiry is checked on read. Lives as long as the process.
pub struct MemorySeenSet {
    entries: Mutex<IndexMap<String, SeenEntry>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemorySeenSet {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySeenSet {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(IndexMap::new()),
            clock,
        }
    }

    /// Stored members, expired ones included.
    pub fn stored(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, SeenEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SeenSet for MemorySeenSet {
    async fn is_member(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.lock();
        let live = match entries.get(key) {
            Some(entry) => entry.is_live(now),
            None => return false,
        };
        if !live {
            entries.shift_remove(key);
        }
        live
    }

    async fn mark_seen(&self, key: &str, retention: Duration) -> bool {
        let now = self.clock.now();
        let mut entries = self.lock();

        // Re-marking moves the key to the young end
        entries.shift_remove(key);
        entries.insert(key.to_string(), SeenEntry::new(now, retention));

        if entries.len() > MAX_ENTRIES {
            entries.retain(|_, entry| entry.is_live(now));
            if entries.len() > LOW_WATERMARK {
                let excess = entries.len() - LOW_WATERMARK;
                entries.drain(..excess);
            }
        }
        true
    }

    async fn count_members(&self) -> usize {
        let now = self.clock.now();
        self.lock().values().filter(|e| e.is_live(now)).count()
    }

    async fn clear(&self) -> bool {
        self.lock().clear();
        true
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;

    const DAY: Duration = Duration::from_secs(86_400);

    #[tokio::test]
    async fn test_membership_expires() {
        let clock = Arc::new(ManualClock::default());
        let seen = MemorySeenSet::with_clock(clock.clone());

        assert!(seen.mark_seen("FPM:none", DAY).await);
        clock.advance(DAY - Duration::from_secs(1));
        assert!(seen.is_member("FPM:none").await);

        clock.advance(Duration::from_secs(2));
        assert!(!seen.is_member("FPM:none").await);
        assert_eq!(seen.stored(), 0);
    }

    #[tokio::test]
    async fn test_remark_refreshes_expiry() {
        let clock = Arc::new(ManualClock::default());
        let seen = MemorySeenSet::with_clock(clock.clone());

        seen.mark_seen("FPM:none", Duration::from_secs(10)).await;
        clock.advance(Duration::from_secs(8));
        seen.mark_seen("FPM:none", Duration::from_secs(10)).await;
        clock.advance(Duration::from_secs(8));

        assert!(seen.is_member("FPM:none").await);
        assert_eq!(seen.count_members().await, 1);
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let seen = MemorySeenSet::new();
        for i in 0..=MAX_ENTRIES {
            seen.mark_seen(&format!("K{}:none", i), DAY).await;
        }

        assert_eq!(seen.stored(), LOW_WATERMARK);
        assert!(!seen.is_member("K0:none").await);
        assert!(seen.is_member(&format!("K{}:none", MAX_ENTRIES)).await);
    }

    #[tokio::test]
    async fn test_clear() {
        let seen = MemorySeenSet::new();
        seen.mark_seen("A:none", DAY).await;
        seen.mark_seen("B:none", DAY).await;

        assert_eq!(seen.count_members().await, 2);
        assert!(seen.clear().await);
        assert_eq!(seen.count_members().await, 0);
    }
}
