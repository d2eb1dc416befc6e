//! Token Launch Extraction Library
//!
//! Turns unstructured launch-board pages into ranked [`Record`]s and keeps a
//! time-boxed seen-set so each record is announced at most once per
//! retention window.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use extraction::{DedupFilter, Extractor, MemorySeenSet};
//!
//! let extractor = Extractor::default();
//! let records = extractor.extract(&html);
//!
//! let dedup = DedupFilter::new(Arc::new(MemorySeenSet::new()));
//! for record in dedup.partition_new(records).await {
//!     // deliver, then:
//!     dedup.commit(&record).await;
//! }
//! ```
//!
//! # Modules
//!
//! - [`types`] - Record model and extraction config
//! - [`pipeline`] - The three extraction strategies plus merge/rank/cap
//! - [`traits`] - KV store, seen-set and clock abstractions
//! - [`stores`] - KV backends (Upstash REST, in-memory)
//! - [`seen`] - Seen-set backends (KV-backed, bounded in-memory)
//! - [`security`] - Credentials kept out of logs
//! - [`dedup`] - Partitioning records into new vs already notified
//! - [`testing`] - Mock implementations for testing

pub mod dedup;
pub mod error;
pub mod pipeline;
pub mod security;
pub mod seen;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

pub use dedup::{DedupFilter, DEFAULT_RETENTION};
pub use error::{KvError, KvResult};
pub use pipeline::{confidence, Extractor, TargetedQuery};
pub use security::{KvCredentials, SecretString};
pub use seen::{KvSeenSet, MemorySeenSet, SeenEntry};
pub use stores::{MemoryKv, UpstashKv};
pub use traits::{
    clock::{Clock, SystemClock},
    kv::KvStore,
    seen::SeenSet,
};
pub use types::{
    config::ExtractionConfig,
    record::{Record, RecordSource, RecordStatus},
};
