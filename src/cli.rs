//! Command-line interface definitions.
//!
//! All CLI arguments, subcommands, and options via the clap derive API.
//! Global options (verbosity, quiet) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # Scan two folders for duplicates
//! quickdupe scan ~/Downloads ~/Pictures
//!
//! # Only compare images, with JSON output for scripting
//! quickdupe scan ~/Pictures -e .jpg -e .png --output json
//!
//! # Smaller boundary windows for faster scans
//! quickdupe scan ~/Videos --bytes 4096
//!
//! # Drop every cached fingerprint
//! quickdupe purge
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cache::CacheKeyMode;

/// Fast duplicate file finder using boundary-window fingerprints.
///
/// quickdupe compares files by hashing only the first and last bytes of
/// each file (16 KiB windows by default), which keeps scans of large media
/// collections cheap, and caches fingerprints between runs.
#[derive(Debug, Parser)]
#[command(name = "quickdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors and results
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan directories for duplicate files
    Scan(ScanArgs),
    /// Truncate the fingerprint cache
    Purge(PurgeArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directories to scan for duplicates
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Only consider files with these extensions (can be repeated)
    ///
    /// Matching is case-insensitive; ".jpg" and "jpg" are equivalent.
    #[arg(short = 'e', long = "extensions", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Number of first and last bytes to compare (default: 16384)
    #[arg(short = 'b', long, value_name = "N")]
    pub bytes: Option<u64>,

    /// Files fingerprinted concurrently per batch (default: 100)
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Output format (text for humans, json for scripting)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Path to the fingerprint cache file
    ///
    /// If not specified, a default platform-specific path is used.
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Disable fingerprint caching
    #[arg(long, conflicts_with = "cache")]
    pub no_cache: bool,

    /// How cache entries are keyed
    ///
    /// "path" reuses a cached fingerprint as long as the path exists, even
    /// if the content changed; "path-meta" also keys on file size and
    /// mtime so most content changes re-hash automatically.
    #[arg(long, value_enum, value_name = "MODE")]
    pub cache_key: Option<CacheKeyMode>,
}

/// Arguments for the purge subcommand.
#[derive(Debug, Args)]
pub struct PurgeArgs {
    /// Path to the fingerprint cache file
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable group listing
    Text,
    /// JSON array of duplicate groups for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_scan() {
        let cli = Cli::try_parse_from(["quickdupe", "scan", "/tmp/a", "/tmp/b"]).unwrap();
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.paths.len(), 2);
                assert!(args.extensions.is_empty());
                assert_eq!(args.output, OutputFormat::Text);
                assert!(!args.no_cache);
            }
            Commands::Purge(_) => panic!("expected scan"),
        }
    }

    #[test]
    fn test_cli_scan_requires_path() {
        assert!(Cli::try_parse_from(["quickdupe", "scan"]).is_err());
    }

    #[test]
    fn test_cli_repeated_extensions() {
        let cli =
            Cli::try_parse_from(["quickdupe", "scan", "/tmp", "-e", ".jpg", "-e", "png"]).unwrap();
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.extensions, vec![".jpg".to_string(), "png".to_string()]);
            }
            Commands::Purge(_) => panic!("expected scan"),
        }
    }

    #[test]
    fn test_cli_bytes_and_batch_size() {
        let cli = Cli::try_parse_from([
            "quickdupe",
            "scan",
            "/tmp",
            "--bytes",
            "4096",
            "--batch-size",
            "50",
        ])
        .unwrap();
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.bytes, Some(4096));
                assert_eq!(args.batch_size, Some(50));
            }
            Commands::Purge(_) => panic!("expected scan"),
        }
    }

    #[test]
    fn test_cli_cache_key_mode() {
        let cli =
            Cli::try_parse_from(["quickdupe", "scan", "/tmp", "--cache-key", "path-meta"]).unwrap();
        match cli.command {
            Commands::Scan(args) => assert_eq!(args.cache_key, Some(CacheKeyMode::PathMeta)),
            Commands::Purge(_) => panic!("expected scan"),
        }
    }

    #[test]
    fn test_cli_no_cache_conflicts_with_cache_path() {
        assert!(Cli::try_parse_from([
            "quickdupe",
            "scan",
            "/tmp",
            "--no-cache",
            "--cache",
            "/tmp/c"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_parses_purge() {
        let cli = Cli::try_parse_from(["quickdupe", "purge"]).unwrap();
        assert!(matches!(cli.command, Commands::Purge(_)));
    }
}
