//! Core trait abstractions for the extraction library.
//!
//! Applications implement these to plug in storage and time:
//! - [`kv::KvStore`]: the remote key-value capability (strings, lists, hashes)
//! - [`seen::SeenSet`]: membership with per-entry expiry
//! - [`clock::Clock`]: wall-clock time, swappable in tests

pub mod clock;
pub mod kv;
pub mod seen;
