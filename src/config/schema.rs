//! Configuration schema for pkgrestore
//!
//! Configuration is stored at `~/.config/pkgrestore/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Framework and runtime restores are bound to
    pub target: TargetConfig,

    /// Package folders and feeds
    pub repositories: RepositoriesConfig,

    /// Lock file cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Restore target
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Target framework moniker, e.g. `netcoreapp3.1`
    pub framework: String,

    /// Runtime identifier, e.g. `win-x64`
    pub runtime: Option<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            framework: "netcoreapp3.1".to_string(),
            runtime: None,
        }
    }
}

/// Where packages live
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoriesConfig {
    /// Global packages folder (default: `~/.pkgrestore/packages`)
    pub global_packages: Option<PathBuf>,

    /// Read-only folders consulted after the global packages folder
    pub fallback_folders: Vec<PathBuf>,

    /// Local feeds packages are installed from
    pub feeds: Vec<PathBuf>,
}

impl RepositoriesConfig {
    /// Configured global packages folder or the per-user default
    pub fn global_packages_dir(&self) -> PathBuf {
        self.global_packages.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".pkgrestore")
                .join("packages")
        })
    }
}

/// Disk cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root (default: `$PKGRESTORE_LOCKFILE_CACHE`, then `~/.pkgrestore/lockfile-cache`)
    pub dir: Option<PathBuf>,

    /// Turn the disk cache off
    pub disabled: bool,
}
