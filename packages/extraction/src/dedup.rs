//! Dedup filter - splits extractor output into new vs already notified.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::traits::seen::SeenSet;
use crate::types::record::Record;

/// How long a notified record stays suppressed.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(86_400);

/// The only writer of seen-set entries.
#[derive(Clone)]
pub struct DedupFilter {
    seen: Arc<dyn SeenSet>,
    retention: Duration,
}

impl DedupFilter {
    pub fn new(seen: Arc<dyn SeenSet>) -> Self {
        Self {
            seen,
            retention: DEFAULT_RETENTION,
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    pub fn seen_set(&self) -> &Arc<dyn SeenSet> {
        &self.seen
    }

    /// Records not yet in the seen-set, in input order.
    pub async fn partition_new(&self, records: Vec<Record>) -> Vec<Record> {
        let total = records.len();
        let mut fresh = Vec::with_capacity(total);
        for record in records {
            if self.seen.is_member(&record.identity_key()).await {
                debug!(key = %record.identity_key(), "Already notified, skipping");
            } else {
                fresh.push(record);
            }
        }
        debug!(total, new = fresh.len(), "Partitioned records");
        fresh
    }

    /// Mark a delivered record as seen. Returns whether the write landed.
    pub async fn commit(&self, record: &Record) -> bool {
        self.seen
            .mark_seen(&record.identity_key(), self.retention)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seen::MemorySeenSet;
    use crate::testing::sample_record;

    #[tokio::test]
    async fn test_partition_keeps_unseen_in_order() {
        let seen = Arc::new(MemorySeenSet::new());
        let filter = DedupFilter::new(seen);

        let records = vec![
            sample_record("AAA", Some("AAAA1111...")),
            sample_record("BBB", None),
            sample_record("CCC", Some("CCCC3333...")),
        ];
        filter.commit(&records[1]).await;

        let fresh = filter.partition_new(records).await;
        let symbols: Vec<&str> = fresh.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "CCC"]);
    }

    #[tokio::test]
    async fn test_partition_is_idempotent_after_commit() {
        let filter = DedupFilter::new(Arc::new(MemorySeenSet::new()));
        let records = vec![sample_record("AAA", None), sample_record("BBB", None)];

        let fresh = filter.partition_new(records.clone()).await;
        assert_eq!(fresh.len(), 2);
        for record in &fresh {
            assert!(filter.commit(record).await);
        }

        assert!(filter.partition_new(records).await.is_empty());
    }

    #[tokio::test]
    async fn test_address_distinguishes_records() {
        let filter = DedupFilter::new(Arc::new(MemorySeenSet::new()));
        filter.commit(&sample_record("AAA", None)).await;

        let fresh = filter
            .partition_new(vec![sample_record("AAA", Some("AAAA1111..."))])
            .await;
        assert_eq!(fresh.len(), 1);
    }

    #[test]
    fn test_retention_override() {
        let filter = DedupFilter::new(Arc::new(MemorySeenSet::new()))
            .with_retention(Duration::from_secs(60));
        assert_eq!(filter.retention(), Duration::from_secs(60));

        let marked = tokio_test::block_on(filter.commit(&sample_record("AAA", None)));
        assert!(marked);
    }
}
