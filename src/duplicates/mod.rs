//! Duplicate detection pipeline.
//!
//! - [`groups`]: duplicate group types, scan summary, and the grouping step
//! - [`finder`]: the batched pipeline driving walker, fingerprinter, and cache

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanOutcome, DEFAULT_BATCH_SIZE};
pub use groups::{group_by_fingerprint, DuplicateGroup, ScanSummary};
