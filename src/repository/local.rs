//! Directory-backed package repository

use crate::error::{RestoreError, RestoreResult};
use crate::lockfile::AssetGroup;
use crate::version::PackageVersion;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Manifest file name inside each package directory
pub const MANIFEST_FILE: &str = "package.toml";

/// Package metadata stored as `package.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub id: String,

    pub version: PackageVersion,

    #[serde(default)]
    pub dependencies: Vec<ManifestDependency>,

    #[serde(default)]
    pub assets: Vec<AssetGroup>,
}

/// Dependency as declared in a manifest (bare versions are minimums)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDependency {
    pub id: String,

    #[serde(default)]
    pub range: String,
}

/// Something the resolution engine can look packages up in
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Human-readable location for logs
    fn location(&self) -> String;

    /// All versions of `id` available from this source
    async fn list_versions(&self, id: &str) -> RestoreResult<Vec<PackageVersion>>;

    /// Manifest of `id` at `version`, if present
    async fn find_package(
        &self,
        id: &str,
        version: &PackageVersion,
    ) -> RestoreResult<Option<PackageManifest>>;

    /// Physical directory of `id` at `version`, if present
    async fn package_dir(&self, id: &str, version: &PackageVersion) -> Option<PathBuf>;
}

/// Repository rooted at a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `id` at `version` lives, whether or not it exists
    pub fn package_path(&self, id: &str, version: &PackageVersion) -> PathBuf {
        self.root
            .join(id.to_lowercase())
            .join(version.to_string().to_lowercase())
    }

    async fn read_manifest(path: &Path) -> RestoreResult<PackageManifest> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| RestoreError::io(format!("reading manifest {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| RestoreError::ManifestInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl PackageSource for LocalRepository {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    async fn list_versions(&self, id: &str) -> RestoreResult<Vec<PackageVersion>> {
        let dir = self.root.join(id.to_lowercase());
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RestoreError::io(
                    format!("listing versions in {}", dir.display()),
                    e,
                ))
            }
        };

        let mut versions = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RestoreError::io(format!("listing versions in {}", dir.display()), e))?
        {
            let path = entry.path();
            if !is_file(&path.join(MANIFEST_FILE)).await {
                continue;
            }
            let name = entry.file_name();
            match PackageVersion::parse(&name.to_string_lossy()) {
                Ok(version) => versions.push(version),
                Err(_) => debug!("Ignoring non-version directory {}", path.display()),
            }
        }

        versions.sort();
        Ok(versions)
    }

    async fn find_package(
        &self,
        id: &str,
        version: &PackageVersion,
    ) -> RestoreResult<Option<PackageManifest>> {
        let manifest_path = self.package_path(id, version).join(MANIFEST_FILE);
        if !is_file(&manifest_path).await {
            return Ok(None);
        }

        let manifest = Self::read_manifest(&manifest_path).await?;
        if manifest.id.to_lowercase() != id.to_lowercase() || &manifest.version != version {
            return Err(RestoreError::ManifestInvalid {
                path: manifest_path,
                reason: format!(
                    "declares {} {} but is stored as {} {}",
                    manifest.id, manifest.version, id, version
                ),
            });
        }

        Ok(Some(manifest))
    }

    async fn package_dir(&self, id: &str, version: &PackageVersion) -> Option<PathBuf> {
        let path = self.package_path(id, version);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Some(path),
            _ => None,
        }
    }
}

async fn is_file(path: &Path) -> bool {
    matches!(fs::metadata(path).await, Ok(meta) if meta.is_file())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Write a package directory with a manifest and empty asset files
    pub fn write_package(root: &Path, manifest: &PackageManifest) -> PathBuf {
        let repo = LocalRepository::new(root);
        let dir = repo.package_path(&manifest.id, &manifest.version);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(MANIFEST_FILE), toml::to_string(manifest).unwrap()).unwrap();

        for group in &manifest.assets {
            for file in group.runtime.iter().chain(&group.native) {
                let path = dir.join(file);
                std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                std::fs::write(path, b"").unwrap();
            }
        }
        dir
    }

    /// Manifest with dependencies given as `(id, range)` pairs
    pub fn manifest(id: &str, version: &str, deps: &[(&str, &str)]) -> PackageManifest {
        PackageManifest {
            id: id.to_string(),
            version: PackageVersion::parse(version).unwrap(),
            dependencies: deps
                .iter()
                .map(|(id, range)| ManifestDependency {
                    id: id.to_string(),
                    range: range.to_string(),
                })
                .collect(),
            assets: vec![AssetGroup {
                rid: None,
                runtime: vec![format!("lib/{}.dll", id)],
                native: vec![],
            }],
        }
    }
}
