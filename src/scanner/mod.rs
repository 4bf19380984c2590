//! Scanner module for directory traversal and boundary-window fingerprinting.
//!
//! This module provides functionality for:
//! - Recursive file discovery with extension filtering
//! - Content fingerprinting over bounded leading/trailing byte windows
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`fingerprint`]: SHA-256 boundary-window fingerprinting (streaming)
//!
//! # Example
//!
//! ```no_run
//! use quickdupe::scanner::{Fingerprinter, Walker};
//! use quickdupe::progress::NullObserver;
//! use std::path::{Path, PathBuf};
//!
//! let walker = Walker::new(vec![PathBuf::from(".")], vec![".txt".to_string()]);
//! let files = walker.walk(&NullObserver).unwrap();
//!
//! let fingerprinter = Fingerprinter::default();
//! for file in &files {
//!     match fingerprinter.fingerprint(Path::new(file)) {
//!         Ok(fp) => println!("{}: {}", file, fp),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod fingerprint;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use fingerprint::{Fingerprinter, DEFAULT_WINDOW};
pub use walker::Walker;

/// Errors that can occur during directory walking.
///
/// All of these are structural: a failure to list a directory fails the
/// whole walk for that root rather than producing a partial file list.
#[derive(thiserror::Error, Debug)]
pub enum WalkError {
    /// A scan root does not exist.
    #[error("Root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// Failed to list a directory while walking.
    #[error("Failed to list {}: {source}", .path.display())]
    List {
        /// Directory that could not be listed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while fingerprinting a single file.
///
/// These are always local to one file: the offending file is dropped from
/// the duplicate set for the run and sibling files keep processing.
#[derive(thiserror::Error, Debug)]
pub enum FingerprintError {
    /// The file was not found (may have vanished mid-scan).
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FingerprintError {
    /// Classify an I/O error for the given file.
    pub(crate) fn from_io(path: &std::path::Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_walk_error_display() {
        let err = WalkError::RootNotFound(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "Root not found: /missing");

        let err = WalkError::List {
            path: PathBuf::from("/locked"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/locked"));
    }

    #[test]
    fn test_fingerprint_error_classification() {
        let err = FingerprintError::from_io(
            Path::new("/gone"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, FingerprintError::NotFound(_)));

        let err = FingerprintError::from_io(
            Path::new("/secret"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, FingerprintError::PermissionDenied(_)));

        let err = FingerprintError::from_io(
            Path::new("/dev/broken"),
            std::io::Error::other("device error"),
        );
        assert!(matches!(err, FingerprintError::Io { .. }));
    }
}
