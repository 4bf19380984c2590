//! Recursive directory walker with extension filtering.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for enumerating every file
//! under a set of root directories. Discovery is order-stable: directory
//! entries are visited in name order, files before subdirectories, so two
//! walks of an unchanged tree produce identical lists.
//!
//! Paths in the result are absolute and forward-slash separated on every
//! platform, which keeps fingerprint cache keys portable.
//!
//! # Error behavior
//!
//! Any failure to list a directory fails the whole walk for that root.
//! There is no partial-directory recovery at this layer; callers that want
//! a best-effort scan must split their roots.

use std::fs;
use std::path::{Path, PathBuf};

use crate::progress::ScanObserver;

use super::WalkError;

/// Recursive file discovery over a list of root directories.
///
/// Roots may be absolute or relative; relative roots are resolved against
/// the current working directory. An empty extension list means no
/// filtering. Extensions are matched case-insensitively against the
/// lowercase, dot-prefixed allow-list.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root directories to scan
    roots: Vec<PathBuf>,
    /// Allow-list of lowercase, dot-prefixed extensions (empty = all files)
    extensions: Vec<String>,
}

impl Walker {
    /// Create a new walker for the given roots.
    ///
    /// # Arguments
    ///
    /// * `roots` - Root directories to scan
    /// * `extensions` - Extension allow-list; entries are normalized to
    ///   lowercase dot-prefixed form (`"JPG"` becomes `".jpg"`)
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, extensions: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|ext| normalize_extension(&ext))
            .collect();
        Self { roots, extensions }
    }

    /// Walk all roots, returning the complete discovery-ordered file list.
    ///
    /// The observer receives `directory_entered` before each directory is
    /// listed and `directory_scanned` with the count of files found
    /// directly beneath it. These events are advisory only.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError`] if a root does not exist or any directory
    /// cannot be listed.
    pub fn walk(&self, observer: &dyn ScanObserver) -> Result<Vec<String>, WalkError> {
        let mut files = Vec::new();

        for root in &self.roots {
            let root = absolutize(root);
            if !root.is_dir() {
                return Err(WalkError::RootNotFound(root));
            }
            self.walk_dir(&root, observer, &mut files)?;
        }

        log::debug!("Discovered {} files under {} roots", files.len(), self.roots.len());
        Ok(files)
    }

    /// Recursively list one directory, files first, then subdirectories.
    fn walk_dir(
        &self,
        dir: &Path,
        observer: &dyn ScanObserver,
        out: &mut Vec<String>,
    ) -> Result<(), WalkError> {
        observer.directory_entered(dir);

        let entries = fs::read_dir(dir).map_err(|source| WalkError::List {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut entries: Vec<fs::DirEntry> = entries
            .collect::<Result<_, _>>()
            .map_err(|source| WalkError::List {
                path: dir.to_path_buf(),
                source,
            })?;
        entries.sort_by_key(fs::DirEntry::file_name);

        let mut subdirs = Vec::new();
        let mut direct_files = 0usize;

        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(|source| WalkError::List {
                path: path.clone(),
                source,
            })?;

            if file_type.is_dir() {
                subdirs.push(path);
                continue;
            }

            if !self.matches_extension(&path) {
                log::trace!("Skipping file due to extension filter: {}", path.display());
                continue;
            }

            direct_files += 1;
            out.push(normalize_path(&path));
        }

        observer.directory_scanned(dir, direct_files);

        for subdir in subdirs {
            self.walk_dir(&subdir, observer, out)?;
        }

        Ok(())
    }

    /// Check a file against the extension allow-list.
    fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .is_some_and(|ext| self.extensions.contains(&ext))
    }
}

/// Normalize an extension to lowercase, dot-prefixed form.
fn normalize_extension(ext: &str) -> String {
    let ext = ext.to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

/// Resolve a possibly-relative path against the current working directory.
///
/// Unlike `canonicalize`, this does not resolve symlinks, so the paths the
/// user handed us survive into the output and the cache.
fn absolutize(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Render a path as an absolute, forward-slash separated string.
pub(crate) fn normalize_path(path: &Path) -> String {
    let path = absolutize(path);
    let s = path.to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}
