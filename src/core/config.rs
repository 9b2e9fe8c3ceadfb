//! YAML configuration for the monitored path set.

use super::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// The configuration surface consumed by the engine.
///
/// `include` and `exclude` are ordered lists of path prefixes; matching
/// semantics live in [`crate::core::matcher::PathMatcher`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Path prefixes to monitor.
    #[serde(default)]
    pub include: Vec<PathBuf>,

    /// Path prefixes to skip. Exclude wins over include.
    #[serde(default)]
    pub exclude: Vec<PathBuf>,

    /// Digest algorithm name (sha256, sha512, md5). Case-insensitive.
    #[serde(default = "default_hash_algorithm")]
    pub hash_algorithm: String,
}

fn default_hash_algorithm() -> String {
    "sha256".to_string()
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            include: Vec::new(),
            exclude: Vec::new(),
            hash_algorithm: default_hash_algorithm(),
        }
    }
}

/// Parse a config file from disk.
pub fn load(path: &Path) -> Result<MonitorConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    parse(&content)
}

/// Parse a config from a YAML string.
pub fn parse(yaml: &str) -> Result<MonitorConfig> {
    serde_yaml_ng::from_str(yaml)
        .map_err(|e| MonitorError::Config(format!("YAML parse error: {}", e)))
}

/// Load a config, falling back to the default (monitor nothing) when the
/// file is missing or unreadable. Never fails: an absent configuration
/// means an empty monitored set, not an error.
pub fn load_or_default(path: &Path) -> MonitorConfig {
    if !path.exists() {
        warn!(config = %path.display(), "config file not found, using empty config");
        return MonitorConfig::default();
    }
    match load(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(config = %path.display(), error = %e, "config unreadable, using empty config");
            MonitorConfig::default()
        }
    }
}
