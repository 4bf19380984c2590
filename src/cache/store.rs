//! Append-only flat-file fingerprint store.
//!
//! # File format
//!
//! UTF-8 text, one record per line: `<key> <fingerprint>\n`. Keys are
//! normalized file paths (optionally suffixed with metadata, see
//! [`CacheKeyMode`]) and may contain spaces, so a line is parsed by taking
//! the last whitespace-delimited token as the fingerprint and everything
//! before it as the key. If the file contains several records for one key,
//! the last one wins; the file is never compacted automatically.
//!
//! Appends are line-based and flushed once per batch, so a scan killed
//! mid-run leaves only whole records from completed batches behind. A
//! missing record just causes a re-hash on the next run.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Errors from loading or writing the fingerprint cache.
///
/// These are loud by design: silently losing the cache would cause
/// unbounded re-hash cost on every future run.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// The backing file exists but could not be read.
    #[error("Failed to read cache {}: {source}", .path.display())]
    Read {
        /// Cache file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The backing file could not be written.
    #[error("Failed to write cache {}: {source}", .path.display())]
    Write {
        /// Cache file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No platform cache directory could be determined.
    #[error("Failed to determine a cache directory for this platform")]
    NoCacheDir,
}

/// How cache entries are keyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CacheKeyMode {
    /// Key by normalized path only. Content changes at an unchanged path
    /// are not detected until the cache is purged.
    #[default]
    Path,
    /// Key by path plus file size and mtime (`<path>#<size>-<mtime>`),
    /// so content changes that touch either re-hash automatically.
    PathMeta,
}

impl CacheKeyMode {
    /// Derive the cache key for a normalized path string.
    ///
    /// In [`CacheKeyMode::PathMeta`] mode, a metadata read failure falls
    /// back to the plain path; the subsequent fingerprint attempt will
    /// surface the real error.
    #[must_use]
    pub fn key_for(self, path: &str) -> String {
        match self {
            Self::Path => path.to_string(),
            Self::PathMeta => match fs::metadata(path) {
                Ok(meta) => {
                    let mtime = meta
                        .modified()
                        .ok()
                        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                        .map_or(0, |d| d.as_secs());
                    format!("{path}#{}-{mtime}", meta.len())
                }
                Err(e) => {
                    log::debug!("Metadata unavailable for {path}, keying by path: {e}");
                    path.to_string()
                }
            },
        }
    }
}

/// Durable path-keyed fingerprint store.
///
/// One instance owns both the in-memory map and the backing file for the
/// duration of a run; concurrent scan processes sharing a cache file are
/// not supported.
#[derive(Debug)]
pub struct FingerprintCache {
    /// Backing file path
    path: PathBuf,
    /// In-memory view, last write wins
    entries: HashMap<String, String>,
}

impl FingerprintCache {
    /// Load the cache from `path`, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`] if the file exists but cannot be read.
    pub fn load(path: PathBuf) -> Result<Self, CacheError> {
        let entries = match fs::read_to_string(&path) {
            Ok(content) => parse_entries(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No cache at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(source) => return Err(CacheError::Read { path, source }),
        };

        log::debug!("Loaded {} cache entries from {}", entries.len(), path.display());
        Ok(Self { path, entries })
    }

    /// The default platform-specific cache file path.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NoCacheDir`] if no cache directory can be
    /// determined for the platform.
    pub fn default_path() -> Result<PathBuf, CacheError> {
        let dirs =
            ProjectDirs::from("com", "quickdupe", "quickdupe").ok_or(CacheError::NoCacheDir)?;
        Ok(dirs.cache_dir().join("fingerprints.cache"))
    }

    /// Look up the cached fingerprint for a key.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Append one entry and update the in-memory view.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Write`] if the append fails.
    pub fn store(&mut self, key: &str, fingerprint: &str) -> Result<(), CacheError> {
        self.append_batch(&[(key.to_string(), fingerprint.to_string())])
    }

    /// Append a batch of entries in a single flush.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Write`] if the append fails. The in-memory
    /// view is only updated after the flush succeeds.
    pub fn append_batch(&mut self, pairs: &[(String, String)]) -> Result<(), CacheError> {
        if pairs.is_empty() {
            return Ok(());
        }

        self.ensure_parent_dir()?;

        let mut buf = String::new();
        for (key, fingerprint) in pairs {
            buf.push_str(key);
            buf.push(' ');
            buf.push_str(fingerprint);
            buf.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| CacheError::Write {
                path: self.path.clone(),
                source,
            })?;
        file.write_all(buf.as_bytes())
            .map_err(|source| CacheError::Write {
                path: self.path.clone(),
                source,
            })?;

        for (key, fingerprint) in pairs {
            self.entries.insert(key.clone(), fingerprint.clone());
        }

        log::debug!("Flushed {} cache entries to {}", pairs.len(), self.path.display());
        Ok(())
    }

    /// Truncate the backing file and clear the in-memory view.
    ///
    /// Safe to call with no scan in progress and idempotent: purging an
    /// already-empty or missing cache succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Write`] if the file cannot be truncated.
    pub fn purge(&mut self) -> Result<(), CacheError> {
        self.ensure_parent_dir()?;
        File::create(&self.path).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.entries.clear();
        log::info!("Purged fingerprint cache at {}", self.path.display());
        Ok(())
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Parse the cache file content into a map, last entry per key winning.
fn parse_entries(content: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();

    for line in content.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        // Keys may contain spaces; the fingerprint never does.
        match line.rsplit_once(' ') {
            Some((key, fingerprint)) if !key.is_empty() => {
                entries.insert(key.to_string(), fingerprint.to_string());
            }
            _ => log::warn!("Skipping malformed cache line: {line:?}"),
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> FingerprintCache {
        FingerprintCache::load(dir.path().join("fp.cache")).unwrap()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        assert!(cache.is_empty());
    }

    #[test]
    fn test_store_and_lookup() {
        let dir = TempDir::new().unwrap();
        let mut cache = cache_in(&dir);

        cache.store("/a/b.txt", "abc-def").unwrap();

        assert_eq!(cache.lookup("/a/b.txt"), Some("abc-def"));
        assert_eq!(cache.lookup("/a/other.txt"), None);
    }

    #[test]
    fn test_entries_survive_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fp.cache");

        let mut cache = FingerprintCache::load(path.clone()).unwrap();
        cache.store("/a/b.txt", "abc-def").unwrap();
        cache.store("/c/d.txt", "123-456").unwrap();
        drop(cache);

        let cache = FingerprintCache::load(path).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup("/a/b.txt"), Some("abc-def"));
        assert_eq!(cache.lookup("/c/d.txt"), Some("123-456"));
    }

    #[test]
    fn test_path_with_spaces_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fp.cache");

        let mut cache = FingerprintCache::load(path.clone()).unwrap();
        cache.store("/my files/holiday photo.jpg", "aaa-bbb").unwrap();
        drop(cache);

        let cache = FingerprintCache::load(path).unwrap();
        assert_eq!(cache.lookup("/my files/holiday photo.jpg"), Some("aaa-bbb"));
    }

    #[test]
    fn test_last_entry_wins() {
        let entries = parse_entries("/a.txt old-fp\n/b.txt keep-fp\n/a.txt new-fp\n");

        assert_eq!(entries.get("/a.txt").map(String::as_str), Some("new-fp"));
        assert_eq!(entries.get("/b.txt").map(String::as_str), Some("keep-fp"));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let entries = parse_entries("justonetoken\n\n/ok.txt fp-1\n");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries.get("/ok.txt").map(String::as_str), Some("fp-1"));
    }

    #[test]
    fn test_append_batch_single_flush() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fp.cache");
        let mut cache = FingerprintCache::load(path.clone()).unwrap();

        cache
            .append_batch(&[
                ("/a.txt".to_string(), "fp-a".to_string()),
                ("/b.txt".to_string(), "fp-b".to_string()),
            ])
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "/a.txt fp-a\n/b.txt fp-b\n");
    }

    #[test]
    fn test_purge_truncates_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fp.cache");
        let mut cache = FingerprintCache::load(path.clone()).unwrap();
        cache.store("/a.txt", "fp-a").unwrap();

        cache.purge().unwrap();
        assert!(cache.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        // Purging again is fine
        cache.purge().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_missing_file_succeeds() {
        let dir = TempDir::new().unwrap();
        let mut cache = FingerprintCache::load(dir.path().join("never-written.cache")).unwrap();

        cache.purge().unwrap();
    }

    #[test]
    fn test_key_mode_path() {
        assert_eq!(CacheKeyMode::Path.key_for("/a/b.txt"), "/a/b.txt");
    }

    #[test]
    fn test_key_mode_path_meta() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, b"12345").unwrap();
        let path_str = file.to_string_lossy().into_owned();

        let key = CacheKeyMode::PathMeta.key_for(&path_str);

        assert!(key.starts_with(&format!("{path_str}#5-")));
        // The metadata suffix contains no whitespace, so the line format is safe
        let suffix = key.rsplit('#').next().unwrap();
        assert!(!suffix.contains(' '));
        assert!(suffix.split('-').all(|part| part.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn test_key_mode_path_meta_missing_file_falls_back() {
        let key = CacheKeyMode::PathMeta.key_for("/does/not/exist.bin");
        assert_eq!(key, "/does/not/exist.bin");
    }
}
