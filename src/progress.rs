//! Progress reporting for the scan pipeline.
//!
//! The core pipeline reports through the [`ScanObserver`] trait and has no
//! dependency on any particular presentation layer. [`Progress`] is the
//! terminal implementation backed by indicatif; tests and embedders can
//! supply their own observer (or [`NullObserver`]).
//!
//! All events are advisory: nothing in the pipeline depends on an observer
//! for correctness.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Observer for scan pipeline events.
///
/// All methods have no-op defaults, so implementors only override what
/// they care about.
pub trait ScanObserver: Send + Sync {
    /// Called before a directory is listed.
    fn directory_entered(&self, _path: &Path) {}

    /// Called after a directory is listed, with the number of files found
    /// directly beneath it (subdirectories not included).
    fn directory_scanned(&self, _path: &Path, _files: usize) {}

    /// Called once discovery finishes across all roots.
    fn discovery_complete(&self, _total: usize) {}

    /// Called per file in discovery order as fingerprints resolve.
    ///
    /// # Arguments
    ///
    /// * `index` - Running 1-based index over the whole file list
    /// * `total` - Total file count
    /// * `path` - The file just resolved
    /// * `fingerprint` - Its fingerprint (cached or freshly computed)
    fn hash_progress(&self, _index: usize, _total: usize, _path: &str, _fingerprint: &str) {}

    /// Called once fingerprinting finishes across all batches.
    ///
    /// Files whose fingerprint failed emit no [`hash_progress`] event, so
    /// this is the only signal that no further progress is coming.
    ///
    /// [`hash_progress`]: ScanObserver::hash_progress
    fn hashing_complete(&self) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ScanObserver for NullObserver {}

/// Terminal progress reporter using indicatif.
///
/// Shows a spinner while walking directories and a bar while hashing.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress output is displayed.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }
}

impl ScanObserver for Progress {
    fn directory_entered(&self, path: &Path) {
        if self.quiet {
            return;
        }

        let mut walking = self.walking.lock().unwrap();
        let pb = walking.get_or_insert_with(|| {
            let pb = self.multi.add(ProgressBar::new_spinner());
            pb.set_style(Self::walking_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_message(format!("Scanning {}", truncate_path(&path.to_string_lossy(), 40)));
    }

    fn directory_scanned(&self, path: &Path, files: usize) {
        if self.quiet {
            return;
        }

        if let Some(ref pb) = *self.walking.lock().unwrap() {
            pb.set_message(format!(
                "Found {files} files in {}",
                truncate_path(&path.to_string_lossy(), 40)
            ));
        }
    }

    fn discovery_complete(&self, total: usize) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.walking.lock().unwrap().take() {
            pb.finish_with_message(format!("Found {total} files"));
        }

        if total > 0 {
            let pb = self.multi.add(ProgressBar::new(total as u64));
            pb.set_style(Self::hashing_style());
            pb.set_message("Fingerprinting");
            *self.hashing.lock().unwrap() = Some(pb);
        }
    }

    fn hash_progress(&self, index: usize, _total: usize, path: &str, fingerprint: &str) {
        if self.quiet {
            return;
        }

        let hashing = self.hashing.lock().unwrap();
        if let Some(ref pb) = *hashing {
            pb.set_position(index as u64);
            let short_fp = &fingerprint[..fingerprint.len().min(8)];
            pb.set_message(format!("{} ({short_fp}...)", truncate_path(path, 30)));
        }
    }

    fn hashing_complete(&self) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.hashing.lock().unwrap().take() {
            pb.finish_with_message("Fingerprinting complete");
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if file_name.len() >= max_len {
        // Count in chars, not bytes: slicing a multibyte name at an
        // arbitrary byte offset would panic.
        let keep = max_len.saturating_sub(3);
        let skip = file_name.chars().count().saturating_sub(keep);
        let tail: String = file_name.chars().skip(skip).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
