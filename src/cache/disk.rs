//! On-disk lock file cache
//!
//! Layout: `<root>/<framework>/<framework-version>/<rid>/<package-id>/<version>`,
//! every segment lower-cased, file content the canonical lock file text.

use crate::error::{RestoreError, RestoreResult};
use crate::target::TargetFramework;
use crate::version::{PackageVersion, VersionRange};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

/// Environment variable overriding the cache root
pub const CACHE_DIR_ENV: &str = "PKGRESTORE_LOCKFILE_CACHE";

/// Directory name used when no runtime identifier is set
pub const UNKNOWN_RID: &str = "unknown-rid";

/// Pick the disk cache root.
///
/// Order: explicit directory, then [`CACHE_DIR_ENV`], then
/// `~/.pkgrestore/lockfile-cache`. `None` disables the disk tier.
pub fn resolve_cache_root(explicit: Option<&Path>, disabled: bool) -> Option<PathBuf> {
    if disabled {
        return None;
    }
    if let Some(dir) = explicit {
        return Some(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(CACHE_DIR_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| home.join(".pkgrestore").join("lockfile-cache"))
}

/// A cached lock file found while listing the cache
#[derive(Debug, Clone)]
pub struct DiskCacheEntry {
    pub framework: String,
    pub framework_version: String,
    pub runtime: String,
    pub package: String,
    pub version: String,
    pub path: PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

/// Disk tier bound to one framework and runtime
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
    framework: TargetFramework,
    runtime: Option<String>,
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>, framework: TargetFramework, runtime: Option<String>) -> Self {
        Self {
            root: root.into(),
            framework,
            runtime,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every cached version of `id`
    pub fn entry_dir(&self, id: &str) -> PathBuf {
        self.root
            .join(self.framework.name.to_lowercase())
            .join(self.framework.version.to_lowercase())
            .join(
                self.runtime
                    .as_deref()
                    .unwrap_or(UNKNOWN_RID)
                    .to_lowercase(),
            )
            .join(id.to_lowercase())
    }

    /// File holding the closure of `id` at `version`
    pub fn entry_path(&self, id: &str, version: &PackageVersion) -> PathBuf {
        self.entry_dir(id).join(version.to_string().to_lowercase())
    }

    /// Cached closure for `id`: the exact version's file, or the highest file inside `range`
    pub async fn read(
        &self,
        id: &str,
        range: &VersionRange,
    ) -> RestoreResult<Option<(PackageVersion, String)>> {
        let version = match range.exact_version() {
            Some(version) => version.clone(),
            None => match self.highest_cached(id, range).await? {
                Some(version) => version,
                None => return Ok(None),
            },
        };

        let path = self.entry_path(id, &version);
        match fs::read_to_string(&path).await {
            Ok(text) => {
                debug!("Read cached lock file {}", path.display());
                Ok(Some((version, text)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RestoreError::CacheRead { path, source: e }),
        }
    }

    async fn highest_cached(
        &self,
        id: &str,
        range: &VersionRange,
    ) -> RestoreResult<Option<PackageVersion>> {
        let dir = self.entry_dir(id);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RestoreError::CacheRead { path: dir, source: e }),
        };

        let mut versions = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RestoreError::CacheRead {
                path: dir.clone(),
                source: e,
            })?
        {
            if let Ok(version) = PackageVersion::parse(&entry.file_name().to_string_lossy()) {
                versions.push(version);
            }
        }

        Ok(range.find_highest_match(&versions).cloned())
    }

    /// Store the closure of `id` at `version` unless a file is already there.
    ///
    /// Returns whether a file was written.
    pub async fn write(&self, id: &str, version: &PackageVersion, text: &str) -> RestoreResult<bool> {
        let path = self.entry_path(id, version);
        let exists = fs::try_exists(&path)
            .await
            .map_err(|e| RestoreError::CacheRead {
                path: path.clone(),
                source: e,
            })?;
        if exists {
            return Ok(false);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RestoreError::CacheWrite {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        // Rust strings are written as plain UTF-8, no byte-order mark
        fs::write(&path, text.as_bytes())
            .await
            .map_err(|e| RestoreError::CacheWrite {
                path: path.clone(),
                source: e,
            })?;

        debug!("Wrote cached lock file {}", path.display());
        Ok(true)
    }

    /// Every cached lock file under `root`, sorted by path
    pub async fn list(root: &Path) -> RestoreResult<Vec<DiskCacheEntry>> {
        if !matches!(fs::metadata(root).await, Ok(meta) if meta.is_dir()) {
            return Ok(Vec::new());
        }

        let root = root.to_path_buf();
        tokio::task::spawn_blocking(move || list_entries(&root))
            .await
            .map_err(|e| RestoreError::Internal(format!("cache listing task failed: {}", e)))?
    }

    /// Delete the whole cache tree under `root`
    pub async fn clear(root: &Path) -> RestoreResult<()> {
        match fs::remove_dir_all(root).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RestoreError::io(format!("removing {}", root.display()), e)),
        }
    }
}

fn list_entries(root: &Path) -> RestoreResult<Vec<DiskCacheEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).min_depth(5).max_depth(5).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            RestoreError::io(
                format!("walking {}", root.display()),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let segments: Vec<String> = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| RestoreError::Internal(e.to_string()))?
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let [framework, framework_version, runtime, package, version] = segments.as_slice() else {
            continue;
        };

        let modified = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from);

        entries.push(DiskCacheEntry {
            framework: framework.clone(),
            framework_version: framework_version.clone(),
            runtime: runtime.clone(),
            package: package.clone(),
            version: version.clone(),
            path: entry.path().to_path_buf(),
            modified,
        });
    }

    Ok(entries)
}
