//! Staleness check for cached closures

use crate::lockfile::LockFile;
use crate::repository::RepositorySet;
use crate::version::VersionRange;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use tracing::debug;

/// Whether a cached closure points at packages that are no longer on disk.
///
/// Every requested id must resolve to a version in `lock` and that version
/// must have a package directory in at least one repository. Ids are
/// probed concurrently.
pub async fn is_stale(
    lock: &LockFile,
    requests: &BTreeMap<String, VersionRange>,
    repositories: &RepositorySet,
) -> bool {
    let probes = requests.keys().map(|id| async move {
        let Some(version) = lock.resolved_version(id) else {
            debug!("Cached closure has no entry for {}", id);
            return false;
        };
        let found = repositories.locate(id, version).await.is_some();
        if !found {
            debug!("Package directory for {} {} is gone", id, version);
        }
        found
    });

    !join_all(probes).await.into_iter().all(|present| present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lockfile::LockLibrary;
    use crate::repository::test_support::{manifest, write_package};
    use crate::target::TargetFramework;
    use crate::version::PackageVersion;
    use tempfile::TempDir;

    fn lock_with(libraries: &[(&str, &str)]) -> LockFile {
        let mut lock = LockFile::new(&TargetFramework::new("netcoreapp", "3.1"), None);
        lock.libraries = libraries
            .iter()
            .map(|(name, version)| LockLibrary {
                name: name.to_string(),
                version: PackageVersion::parse(version).unwrap(),
                dependencies: vec![],
                assets: vec![],
            })
            .collect();
        lock
    }

    fn requests(ids: &[&str]) -> BTreeMap<String, VersionRange> {
        ids.iter()
            .map(|id| (id.to_string(), VersionRange::floating_any()))
            .collect()
    }

    #[tokio::test]
    async fn present_in_fallback_is_fresh() {
        let global = TempDir::new().unwrap();
        let fallback = TempDir::new().unwrap();
        write_package(fallback.path(), &manifest("Foo", "1.0.0", &[]));
        let repos = RepositorySet::new(global.path(), [fallback.path().to_path_buf()]);

        let lock = lock_with(&[("Foo", "1.0.0")]);
        assert!(!is_stale(&lock, &requests(&["Foo"]), &repos).await);
    }

    #[tokio::test]
    async fn deleted_directory_is_stale() {
        let global = TempDir::new().unwrap();
        let dir = write_package(global.path(), &manifest("Foo", "1.0.0", &[]));
        write_package(global.path(), &manifest("Bar", "2.0.0", &[]));
        let repos = RepositorySet::new(global.path(), []);
        let lock = lock_with(&[("Foo", "1.0.0"), ("Bar", "2.0.0")]);

        assert!(!is_stale(&lock, &requests(&["Foo", "Bar"]), &repos).await);
        std::fs::remove_dir_all(dir).unwrap();
        assert!(is_stale(&lock, &requests(&["Foo", "Bar"]), &repos).await);
    }

    #[tokio::test]
    async fn only_requested_ids_are_checked() {
        let global = TempDir::new().unwrap();
        write_package(global.path(), &manifest("Foo", "1.0.0", &[]));
        let repos = RepositorySet::new(global.path(), []);

        // Transitive dependency missing on disk does not make the closure stale
        let lock = lock_with(&[("Foo", "1.0.0"), ("Dep", "1.0.0")]);
        assert!(!is_stale(&lock, &requests(&["Foo"]), &repos).await);
    }

    #[tokio::test]
    async fn unknown_id_is_stale() {
        let global = TempDir::new().unwrap();
        let repos = RepositorySet::new(global.path(), []);
        let lock = lock_with(&[]);
        assert!(is_stale(&lock, &requests(&["Foo"]), &repos).await);
    }
}
