//! Ordered set of local repositories

use super::{LocalRepository, PackageSource};
use crate::version::PackageVersion;
use futures_util::future::join_all;
use std::path::{Path, PathBuf};

/// Global packages folder followed by fallback folders.
///
/// Lookups walk the repositories in order; the first one holding a
/// package wins.
#[derive(Debug, Clone, Default)]
pub struct RepositorySet {
    repositories: Vec<LocalRepository>,
}

impl RepositorySet {
    /// Set with `global` first and `fallbacks` after it, duplicates removed
    pub fn new(global: impl Into<PathBuf>, fallbacks: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut set = Self::default();
        set.push(global.into());
        for root in fallbacks {
            set.push(root);
        }
        set
    }

    fn push(&mut self, root: PathBuf) {
        if !self.repositories.iter().any(|r| r.root() == root) {
            self.repositories.push(LocalRepository::new(root));
        }
    }

    /// Repository packages get installed into
    pub fn global(&self) -> Option<&LocalRepository> {
        self.repositories.first()
    }

    /// Repository rooted at `root`
    pub fn get(&self, root: &Path) -> Option<&LocalRepository> {
        self.repositories.iter().find(|r| r.root() == root)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalRepository> {
        self.repositories.iter()
    }

    pub fn roots(&self) -> impl Iterator<Item = &Path> {
        self.repositories.iter().map(|r| r.root())
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// First repository directory that physically holds `id` at `version`
    pub async fn locate(&self, id: &str, version: &PackageVersion) -> Option<PathBuf> {
        let probes = self.repositories.iter().map(|r| r.package_dir(id, version));
        join_all(probes).await.into_iter().flatten().next()
    }
}
