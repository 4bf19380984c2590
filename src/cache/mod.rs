//! Fingerprint caching module.
//!
//! Persistent storage for file fingerprints so repeated scans only hash
//! files that were not seen before.
//!
//! # Architecture
//!
//! * [`store`]: the append-only flat-file store and its line format.
//!
//! # Cache Invalidation
//!
//! By default entries are keyed by path alone, so a file whose content
//! changes at the same path keeps returning its old fingerprint until the
//! cache is purged. [`CacheKeyMode::PathMeta`] keys entries by path plus
//! size and mtime instead, which makes most content changes re-hash
//! naturally at the cost of re-hashing after metadata-only changes.

pub mod store;

pub use store::{CacheError, CacheKeyMode, FingerprintCache};
