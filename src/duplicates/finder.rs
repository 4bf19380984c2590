//! Batched duplicate detection pipeline.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives the whole run:
//!
//! 1. **Walk**: enumerate every matching file under the roots
//! 2. **Load cache**: read the persistent fingerprint store
//! 3. **Fingerprint**: process the file list in fixed-size batches; cache
//!    hits resolve synchronously, misses are hashed concurrently on the
//!    rayon pool; each batch ends with one cache flush
//! 4. **Group**: fold all pairs back in discovery order and keep groups
//!    with two or more members
//!
//! The batch size is the explicit concurrency cap: only one batch's reads
//! are ever in flight, which bounds open file descriptors and peak memory
//! and gives a natural checkpoint for flushing the cache. Batches run
//! strictly sequentially.
//!
//! Per-file fingerprint failures are logged, counted in the summary, and
//! dropped; they never abort the batch or the run. Walk and cache errors
//! are structural and abort the run.
//!
//! # Example
//!
//! ```no_run
//! use quickdupe::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_extensions(vec![".jpg".into()]));
//! let outcome = finder.run(&[PathBuf::from("/photos")]).unwrap();
//!
//! for group in &outcome.groups {
//!     println!("{} files share {}", group.len(), group.fingerprint);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use crate::cache::{CacheError, CacheKeyMode, FingerprintCache};
use crate::progress::{NullObserver, ScanObserver};
use crate::scanner::{Fingerprinter, Walker, WalkError, DEFAULT_WINDOW};

use super::groups::{group_by_fingerprint, DuplicateGroup, ScanSummary};

/// Default number of files fingerprinted concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Structural errors that abort a run.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// Discovery failed for a root.
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// The fingerprint cache could not be read or written.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Configuration for a duplicate detection run.
#[derive(Clone)]
pub struct FinderConfig {
    /// Boundary window size in bytes
    pub window: u64,
    /// Files per batch; also the concurrency cap
    pub batch_size: usize,
    /// Extension allow-list (empty = all files)
    pub extensions: Vec<String>,
    /// Fingerprint cache location; `None` uses the platform default
    pub cache_path: Option<PathBuf>,
    /// Whether to consult and populate the cache at all
    pub use_cache: bool,
    /// How cache entries are keyed
    pub cache_key: CacheKeyMode,
    /// Optional observer for progress events
    pub observer: Option<Arc<dyn ScanObserver>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("window", &self.window)
            .field("batch_size", &self.batch_size)
            .field("extensions", &self.extensions)
            .field("cache_path", &self.cache_path)
            .field("use_cache", &self.use_cache)
            .field("cache_key", &self.cache_key)
            .field("observer", &self.observer.as_ref().map(|_| "<observer>"))
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            batch_size: DEFAULT_BATCH_SIZE,
            extensions: Vec::new(),
            cache_path: None,
            use_cache: true,
            cache_key: CacheKeyMode::default(),
            observer: None,
        }
    }
}

impl FinderConfig {
    /// Set the boundary window size in bytes.
    #[must_use]
    pub fn with_window(mut self, window: u64) -> Self {
        self.window = window;
        self
    }

    /// Set the batch size (clamped to at least 1).
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the extension allow-list.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Set an explicit cache file location.
    #[must_use]
    pub fn with_cache_path(mut self, path: PathBuf) -> Self {
        self.cache_path = Some(path);
        self
    }

    /// Disable the fingerprint cache entirely.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    /// Set the cache key mode.
    #[must_use]
    pub fn with_cache_key(mut self, mode: CacheKeyMode) -> Self {
        self.cache_key = mode;
        self
    }

    /// Set the progress observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Duplicate groups in deterministic discovery order, each with ≥ 2 files
    pub groups: Vec<DuplicateGroup>,
    /// Run statistics
    pub summary: ScanSummary,
}

/// Drives the walk → fingerprint → group pipeline.
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Run the full pipeline over the given roots.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] for structural failures: a bad root, an
    /// unreadable cache, or a failed cache flush. Per-file fingerprint
    /// failures are recorded in the summary instead.
    pub fn run(&self, roots: &[PathBuf]) -> Result<ScanOutcome, FinderError> {
        let start = Instant::now();
        let observer: Arc<dyn ScanObserver> = self
            .config
            .observer
            .clone()
            .unwrap_or_else(|| Arc::new(NullObserver));

        // Phase 1: discovery
        let walker = Walker::new(roots.to_vec(), self.config.extensions.clone());
        let files = walker.walk(observer.as_ref())?;
        observer.discovery_complete(files.len());
        log::info!("Discovered {} files", files.len());

        // Phase 2: cache load
        let mut cache = self.open_cache()?;

        // Phase 3: batched fingerprinting
        let fingerprinter = Fingerprinter::new(self.config.window);
        let total = files.len();
        let mut summary = ScanSummary {
            total_files: total,
            ..ScanSummary::default()
        };
        let mut resolved: Vec<(String, Option<String>)> = Vec::with_capacity(total);

        for batch in files.chunks(self.config.batch_size) {
            summary.batches += 1;
            let offset = resolved.len();

            // Resolve cache hits synchronously, collect misses for hashing
            let keys: Vec<String> = batch
                .iter()
                .map(|path| self.config.cache_key.key_for(path))
                .collect();
            let mut fingerprints: Vec<Option<String>> = batch
                .iter()
                .zip(&keys)
                .map(|(path, key)| {
                    let hit = cache
                        .as_ref()
                        .and_then(|c| c.lookup(key))
                        .map(ToString::to_string);
                    if hit.is_some() {
                        log::trace!("Cache hit: {path}");
                        summary.cache_hits += 1;
                    }
                    hit
                })
                .collect();

            let misses: Vec<usize> = (0..batch.len())
                .filter(|&i| fingerprints[i].is_none())
                .collect();

            // All misses in the batch are fingerprinted concurrently; the
            // batch waits for every member before flushing the cache.
            let computed: Vec<(usize, Result<String, crate::scanner::FingerprintError>)> = misses
                .par_iter()
                .map(|&i| (i, fingerprinter.fingerprint(Path::new(&batch[i]))))
                .collect();

            let mut fresh: Vec<(String, String)> = Vec::new();
            for (i, result) in computed {
                match result {
                    Ok(fingerprint) => {
                        summary.files_hashed += 1;
                        fresh.push((keys[i].clone(), fingerprint.clone()));
                        fingerprints[i] = Some(fingerprint);
                    }
                    Err(e) => {
                        log::warn!("Skipping file: {e}");
                        summary.failed_files += 1;
                    }
                }
            }

            // One flush per batch; a write failure here is fatal because
            // silently losing the cache would re-hash everything forever.
            if let Some(ref mut cache) = cache {
                cache.append_batch(&fresh)?;
            }

            // Progress in discovery order, not completion order
            for (i, path) in batch.iter().enumerate() {
                let fingerprint = fingerprints[i].take();
                if let Some(ref fp) = fingerprint {
                    observer.hash_progress(offset + i + 1, total, path, fp);
                }
                resolved.push((path.clone(), fingerprint));
            }
        }

        // Failed files emit no hash_progress event, so the observer needs
        // an explicit end-of-hashing signal.
        observer.hashing_complete();

        // Phase 4: grouping in discovery order
        let groups = group_by_fingerprint(
            resolved
                .into_iter()
                .filter_map(|(path, fp)| fp.map(|f| (path, f))),
        );

        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::len).sum();
        summary.elapsed = start.elapsed();

        log::info!(
            "Found {} duplicate groups ({} files) in {:.2}s; {} hashed, {} cached, {} skipped",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.elapsed.as_secs_f64(),
            summary.files_hashed,
            summary.cache_hits,
            summary.failed_files,
        );

        Ok(ScanOutcome { groups, summary })
    }

    fn open_cache(&self) -> Result<Option<FingerprintCache>, FinderError> {
        if !self.config.use_cache {
            log::debug!("Fingerprint cache disabled");
            return Ok(None);
        }

        let path = match &self.config.cache_path {
            Some(path) => path.clone(),
            None => FingerprintCache::default_path()?,
        };
        Ok(Some(FingerprintCache::load(path)?))
    }
}
