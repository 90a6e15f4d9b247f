//! State shared by every restore a resolver performs

use crate::error::{RestoreError, RestoreResult};
use crate::repository::{install_package, LocalRepository, PackageManifest, PackageSource, RepositorySet};
use crate::version::PackageVersion;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Repositories, feeds and the manifest cache shared across restores
pub struct RestoreContext {
    repositories: RepositorySet,
    feeds: Vec<LocalRepository>,
    scratch_dir: PathBuf,
    manifests: Mutex<HashMap<(String, PackageVersion), Arc<PackageManifest>>>,
}

impl RestoreContext {
    /// Create a context with a process-unique scratch directory
    pub fn new(repositories: RepositorySet, feeds: Vec<LocalRepository>) -> Self {
        let scratch_base = repositories
            .global()
            .map(|r| r.root().to_path_buf())
            .unwrap_or_else(std::env::temp_dir);
        let scratch_dir = scratch_base
            .join(".pkgrestore-tmp")
            .join(format!("{}-{}", std::process::id(), uuid::Uuid::new_v4()));

        Self {
            repositories,
            feeds,
            scratch_dir,
            manifests: Mutex::new(HashMap::new()),
        }
    }

    pub fn repositories(&self) -> &RepositorySet {
        &self.repositories
    }

    pub fn feeds(&self) -> &[LocalRepository] {
        &self.feeds
    }

    /// Staging area for package installs; only ever written to
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    fn sources(&self) -> impl Iterator<Item = &LocalRepository> {
        self.repositories.iter().chain(self.feeds.iter())
    }

    /// Every version of `id` across repositories and feeds, ascending
    pub async fn available_versions(&self, id: &str) -> RestoreResult<Vec<PackageVersion>> {
        let mut versions = Vec::new();
        for source in self.sources() {
            versions.extend(source.list_versions(id).await?);
        }
        versions.sort();
        versions.dedup();
        Ok(versions)
    }

    /// Manifest of `id` at `version` from the first source holding it
    pub async fn manifest(
        &self,
        id: &str,
        version: &PackageVersion,
    ) -> RestoreResult<Option<Arc<PackageManifest>>> {
        let key = (id.to_lowercase(), version.clone());
        if let Some(found) = self.cached_manifest(&key)? {
            return Ok(Some(found));
        }

        for source in self.sources() {
            if let Some(manifest) = source.find_package(id, version).await? {
                debug!("Read manifest for {} {} from {}", id, version, source.location());
                let manifest = Arc::new(manifest);
                self.manifests
                    .lock()
                    .map_err(|_| RestoreError::Internal("manifest cache poisoned".to_string()))?
                    .insert(key, Arc::clone(&manifest));
                return Ok(Some(manifest));
            }
        }

        Ok(None)
    }

    fn cached_manifest(
        &self,
        key: &(String, PackageVersion),
    ) -> RestoreResult<Option<Arc<PackageManifest>>> {
        let manifests = self
            .manifests
            .lock()
            .map_err(|_| RestoreError::Internal("manifest cache poisoned".to_string()))?;
        Ok(manifests.get(key).cloned())
    }

    /// Make sure `id` at `version` exists in a repository, installing it from a feed if needed
    pub async fn ensure_installed(&self, id: &str, version: &PackageVersion) -> RestoreResult<PathBuf> {
        if let Some(dir) = self.repositories.locate(id, version).await {
            return Ok(dir);
        }

        let global = self.repositories.global().ok_or_else(|| {
            RestoreError::Resolution("no global packages folder configured".to_string())
        })?;

        for feed in &self.feeds {
            if feed.package_dir(id, version).await.is_some() {
                return install_package(feed, global, id, version, &self.scratch_dir).await;
            }
        }

        Err(RestoreError::PackageNotFound {
            id: id.to_string(),
            range: format!("[{}]", version),
        })
    }
}

impl Drop for RestoreContext {
    fn drop(&mut self) {
        // Staging dirs are renamed away on success; this only clears leftovers
        let _ = std::fs::remove_dir_all(&self.scratch_dir);
    }
}
