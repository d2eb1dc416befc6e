//! Seen-set capability.

use async_trait::async_trait;
use std::time::Duration;

/// Identity keys that have already been notified, each with an expiry.
///
/// Implementations absorb their own storage failures: a failed lookup
/// reports "not a member", a failed write reports `false`. The caller
/// keeps going either way.
#[async_trait]
pub trait SeenSet: Send + Sync {
    /// Whether `key` was marked and has not yet expired.
    async fn is_member(&self, key: &str) -> bool;

    /// Mark `key` as seen for `retention`. Returns whether the write landed.
    async fn mark_seen(&self, key: &str, retention: Duration) -> bool;

    /// Number of live members.
    async fn count_members(&self) -> usize;

    /// Remove every member. Returns whether the clear succeeded.
    async fn clear(&self) -> bool;

    /// Short backend name for status reporting.
    fn backend(&self) -> &'static str;
}
