//! quickdupe - Fast Duplicate File Finder
//!
//! Finds duplicate files by comparing boundary-window fingerprints: each
//! file is identified by SHA-256 digests of its first and last 16 KiB, so
//! large files never need to be read in full. Fingerprints are cached
//! between runs in an append-only flat file, making repeated scans
//! incremental.

pub mod cache;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod progress;
pub mod scanner;

use std::sync::Arc;

use anyhow::Context;

use crate::cache::FingerprintCache;
use crate::cli::{Cli, Commands, OutputFormat, PurgeArgs, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig, ScanOutcome};
use crate::error::ExitCode;
use crate::progress::Progress;

/// Run the application with parsed CLI arguments.
///
/// # Errors
///
/// Returns an error for structural failures (bad roots, unreadable or
/// unwritable cache); per-file failures are reported in the summary and
/// reflected in the exit code instead.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Scan(args) => run_scan(&args, cli.quiet),
        Commands::Purge(args) => run_purge(&args),
    }
}

fn run_scan(args: &ScanArgs, quiet: bool) -> anyhow::Result<ExitCode> {
    let defaults = Config::load();

    let mut config = FinderConfig::default()
        .with_window(args.bytes.unwrap_or(defaults.bytes))
        .with_batch_size(args.batch_size.unwrap_or(defaults.batch_size))
        .with_extensions(args.extensions.clone())
        .with_cache_key(args.cache_key.unwrap_or(defaults.cache_key))
        .with_observer(Arc::new(Progress::new(quiet)));
    if args.no_cache {
        config = config.without_cache();
    } else if let Some(path) = &args.cache {
        config = config.with_cache_path(path.clone());
    }

    let outcome = DuplicateFinder::new(config)
        .run(&args.paths)
        .context("Scan failed")?;

    match args.output {
        OutputFormat::Text => print_text(&outcome),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome.groups)
                .context("Failed to serialize duplicate groups")?;
            println!("{json}");
        }
    }

    Ok(exit_code_for(&outcome))
}

fn run_purge(args: &PurgeArgs) -> anyhow::Result<ExitCode> {
    let path = match &args.cache {
        Some(path) => path.clone(),
        None => FingerprintCache::default_path().context("Failed to locate cache")?,
    };

    let mut cache = FingerprintCache::load(path).context("Failed to open cache")?;
    cache.purge().context("Failed to purge cache")?;
    println!("Cache purged!");

    Ok(ExitCode::Success)
}

fn print_text(outcome: &ScanOutcome) {
    for group in &outcome.groups {
        println!("{}", group.fingerprint);
        for file in &group.files {
            println!("  {file}");
        }
        println!();
    }

    let summary = &outcome.summary;
    println!(
        "Found {} duplicate groups ({} files) among {} files in {:.2}s",
        summary.duplicate_groups,
        summary.duplicate_files,
        summary.total_files,
        summary.elapsed.as_secs_f64(),
    );
    println!(
        "{} fingerprinted, {} from cache, {} skipped",
        summary.files_hashed, summary.cache_hits, summary.failed_files,
    );
}

fn exit_code_for(outcome: &ScanOutcome) -> ExitCode {
    if outcome.summary.failed_files > 0 {
        ExitCode::PartialSuccess
    } else if outcome.groups.is_empty() {
        ExitCode::NoDuplicates
    } else {
        ExitCode::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::{DuplicateGroup, ScanSummary};

    fn outcome(groups: Vec<DuplicateGroup>, failed: usize) -> ScanOutcome {
        ScanOutcome {
            groups,
            summary: ScanSummary {
                failed_files: failed,
                ..ScanSummary::default()
            },
        }
    }

    #[test]
    fn test_exit_code_no_duplicates() {
        assert_eq!(exit_code_for(&outcome(Vec::new(), 0)), ExitCode::NoDuplicates);
    }

    #[test]
    fn test_exit_code_success() {
        let group = DuplicateGroup {
            fingerprint: "fp".to_string(),
            files: vec!["/a".to_string(), "/b".to_string()],
        };
        assert_eq!(exit_code_for(&outcome(vec![group], 0)), ExitCode::Success);
    }

    #[test]
    fn test_exit_code_partial_success_wins() {
        assert_eq!(
            exit_code_for(&outcome(Vec::new(), 2)),
            ExitCode::PartialSuccess
        );
    }
}
