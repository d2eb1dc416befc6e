//! Seen-set and dedup behaviour across both backends.

use std::sync::Arc;
use std::time::Duration;

use extraction::testing::{sample_record, FailingKv, ManualClock};
use extraction::{DedupFilter, KvSeenSet, MemoryKv, MemorySeenSet, SeenSet};

const RETENTION: Duration = Duration::from_secs(86_400);

fn backends(clock: Arc<ManualClock>) -> Vec<Arc<dyn SeenSet>> {
    let memory: Arc<dyn SeenSet> = Arc::new(MemorySeenSet::with_clock(clock.clone()));
    let kv: Arc<dyn SeenSet> = Arc::new(
        KvSeenSet::new(Arc::new(MemoryKv::with_clock(clock.clone()))).with_clock(clock),
    );
    vec![memory, kv]
}

#[tokio::test]
async fn one_of_three_already_seen() {
    for seen in backends(Arc::new(ManualClock::default())) {
        let filter = DedupFilter::new(seen.clone());
        let records = vec![
            sample_record("AAA", Some("AAAA1111...")),
            sample_record("BBB", Some("BBBB2222...")),
            sample_record("CCC", None),
        ];
        seen.mark_seen("BBB:BBBB2222...", RETENTION).await;

        let fresh = filter.partition_new(records).await;

        let keys: Vec<String> = fresh.iter().map(|r| r.identity_key()).collect();
        assert_eq!(keys, vec!["AAA:AAAA1111...", "CCC:none"], "backend {}", seen.backend());
    }
}

#[tokio::test]
async fn commit_then_partition_is_empty() {
    for seen in backends(Arc::new(ManualClock::default())) {
        let filter = DedupFilter::new(seen);
        let records = vec![sample_record("AAA", None), sample_record("BBB", None)];

        for record in filter.partition_new(records.clone()).await {
            assert!(filter.commit(&record).await);
        }

        assert!(filter.partition_new(records).await.is_empty());
    }
}

#[tokio::test]
async fn membership_ends_after_retention() {
    let clock = Arc::new(ManualClock::default());
    for seen in backends(clock.clone()) {
        let filter = DedupFilter::new(seen.clone()).with_retention(RETENTION);
        let record = sample_record("AAA", None);

        filter.commit(&record).await;
        clock.advance(RETENTION - Duration::from_secs(1));
        assert!(seen.is_member("AAA:none").await, "backend {}", seen.backend());

        clock.advance(Duration::from_secs(2));
        assert!(!seen.is_member("AAA:none").await, "backend {}", seen.backend());
        assert_eq!(filter.partition_new(vec![record]).await.len(), 1);
    }
}

#[tokio::test]
async fn broken_store_treats_everything_as_new() {
    let filter = DedupFilter::new(Arc::new(KvSeenSet::new(Arc::new(FailingKv))));
    let records = vec![sample_record("AAA", None), sample_record("BBB", None)];

    assert!(!filter.commit(&records[0]).await);
    assert_eq!(filter.partition_new(records).await.len(), 2);
}
