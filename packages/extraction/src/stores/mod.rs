//! Key-value backends.
//!
//! - `UpstashKv` - Upstash Redis over its REST API
//! - `MemoryKv` - In-memory, for tests and local development

pub mod memory;
pub mod upstash;

pub use memory::MemoryKv;
pub use upstash::UpstashKv;
