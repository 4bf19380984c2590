//! Duplicate grouping and scan statistics.
//!
//! # Overview
//!
//! Grouping is the final, purely in-memory step of the pipeline: every
//! (path, fingerprint) pair is folded into a fingerprint→files mapping in
//! discovery order, and only groups with two or more members survive.
//! Iterating the discovery-ordered list rather than completion order is
//! what makes the output deterministic even though fingerprints within a
//! batch complete in arbitrary order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A fingerprint shared by two or more files.
///
/// File order reflects discovery order. The fingerprint is a policy-level
/// identity (boundary windows only), not a guarantee of byte equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Shared boundary-window fingerprint
    pub fingerprint: String,
    /// Files sharing the fingerprint, in discovery order
    pub files: Vec<String>,
}

impl DuplicateGroup {
    /// Number of files in this group (always ≥ 2 in pipeline output).
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the group is empty. Pipeline output never is.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of files that could be removed while keeping one copy.
    #[must_use]
    pub fn redundant_files(&self) -> usize {
        self.files.len().saturating_sub(1)
    }
}

/// Statistics for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Files discovered by the walker
    pub total_files: usize,
    /// Files whose content was actually read and hashed this run
    pub files_hashed: usize,
    /// Files resolved from the cache without I/O
    pub cache_hits: usize,
    /// Files dropped because fingerprinting failed
    pub failed_files: usize,
    /// Number of batches processed (one cache flush checkpoint each)
    pub batches: usize,
    /// Duplicate groups in the final output
    pub duplicate_groups: usize,
    /// Total files across all duplicate groups
    pub duplicate_files: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Fold discovery-ordered (path, fingerprint) pairs into duplicate groups.
///
/// Group creation order follows the first discovery of each fingerprint,
/// and files within a group keep discovery order. Fingerprints reached by
/// exactly one file are dropped.
#[must_use]
pub fn group_by_fingerprint<I>(pairs: I) -> Vec<DuplicateGroup>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for (path, fingerprint) in pairs {
        match index.get(&fingerprint) {
            Some(&i) => groups[i].files.push(path),
            None => {
                index.insert(fingerprint.clone(), groups.len());
                groups.push(DuplicateGroup {
                    fingerprint,
                    files: vec![path],
                });
            }
        }
    }

    groups.retain(|g| g.files.len() > 1);
    groups
}
