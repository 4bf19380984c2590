//! Application configuration management.
//!
//! Loads persistent defaults for the scan pipeline (window size, batch
//! size, cache key mode) from a JSON file in the platform config
//! directory. CLI flags always override these values.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cache::CacheKeyMode;
use crate::duplicates::DEFAULT_BATCH_SIZE;
use crate::scanner::DEFAULT_WINDOW;

/// Persistent application defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Boundary window size in bytes
    #[serde(default = "default_window")]
    pub bytes: u64,
    /// Files fingerprinted concurrently per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// How cache entries are keyed
    #[serde(default)]
    pub cache_key: CacheKeyMode,
}

fn default_window() -> u64 {
    DEFAULT_WINDOW
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bytes: DEFAULT_WINDOW,
            batch_size: DEFAULT_BATCH_SIZE,
            cache_key: CacheKeyMode::default(),
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path,
    /// falling back to defaults on any failure.
    pub fn load() -> Self {
        match Self::load_internal() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn load_internal() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get the default platform-specific configuration path.
    fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "quickdupe", "quickdupe")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bytes, 16 * 1024);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.cache_key, CacheKeyMode::Path);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"bytes": 4096}"#).unwrap();
        assert_eq!(config.bytes, 4096);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.cache_key, CacheKeyMode::Path);
    }

    #[test]
    fn test_cache_key_serialization() {
        let config: Config = serde_json::from_str(r#"{"cache_key": "path-meta"}"#).unwrap();
        assert_eq!(config.cache_key, CacheKeyMode::PathMeta);

        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("\"path\""));
    }
}
