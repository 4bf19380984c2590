//! Boundary-window fingerprinting with SHA-256.
//!
//! # Overview
//!
//! A fingerprint is derived from at most the first *W* bytes and at most
//! the last *W* bytes of a file, each digested independently with SHA-256
//! and joined as `<prefix-hex>-<suffix-hex>`. Two files sharing a
//! fingerprint are treated as duplicates by policy; this trades a small
//! false-positive risk for never reading the middle of large files.
//!
//! For files smaller than `2 * W` the windows overlap, and for files
//! smaller than `W` both windows cover the entire content. That is
//! intentional: a file smaller than the window is fully covered either way.
//!
//! Reads are streamed through a fixed-size buffer, so memory use is
//! independent of file size.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::FingerprintError;

/// Default boundary window size: 16 KiB.
pub const DEFAULT_WINDOW: u64 = 16 * 1024;

/// Chunk size for streaming reads.
const READ_BUF_SIZE: usize = 8 * 1024;

/// Computes boundary-window fingerprints for files.
#[derive(Debug, Clone, Copy)]
pub struct Fingerprinter {
    /// Maximum number of bytes hashed from each end of a file
    window: u64,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Fingerprinter {
    /// Create a fingerprinter with the given window size in bytes.
    ///
    /// A window of zero is clamped to one byte so the digest always covers
    /// some content for non-empty files.
    #[must_use]
    pub fn new(window: u64) -> Self {
        Self {
            window: window.max(1),
        }
    }

    /// The configured window size in bytes.
    #[must_use]
    pub fn window(&self) -> u64 {
        self.window
    }

    /// Compute the fingerprint for one file.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError`] if the file cannot be opened or read.
    /// Errors are local to this file and never affect sibling files.
    pub fn fingerprint(&self, path: &Path) -> Result<String, FingerprintError> {
        let file = File::open(path).map_err(|e| FingerprintError::from_io(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| FingerprintError::from_io(path, e))?
            .len();

        let mut reader = BufReader::new(file);

        let prefix_len = self.window.min(len);
        let prefix = digest_window(&mut reader, 0, prefix_len)
            .map_err(|e| FingerprintError::from_io(path, e))?;

        let suffix_start = len.saturating_sub(self.window);
        let suffix = digest_window(&mut reader, suffix_start, len - suffix_start)
            .map_err(|e| FingerprintError::from_io(path, e))?;

        Ok(format!("{prefix}-{suffix}"))
    }
}

/// Digest `count` bytes starting at `start`, streaming in fixed chunks.
fn digest_window<R: Read + Seek>(reader: &mut R, start: u64, count: u64) -> std::io::Result<String> {
    reader.seek(SeekFrom::Start(start))?;

    let mut hasher = Sha256::new();
    let mut buf = [0u8; READ_BUF_SIZE];
    let mut remaining = count;

    while remaining > 0 {
        let want = remaining.min(READ_BUF_SIZE as u64) as usize;
        let n = reader.read(&mut buf[..want])?;
        if n == 0 {
            // File shrank under us; hash what we got
            break;
        }
        hasher.update(&buf[..n]);
        remaining -= n as u64;
    }

    Ok(format!("{:x}", hasher.finalize()))
}
