//! Mapping resolved libraries to files on disk

use super::{AssetGroup, LockLibrary};
use crate::error::{RestoreError, RestoreResult};
use crate::repository::RepositorySet;
use crate::target::RuntimeGraph;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Strategy choosing which package-relative files a library contributes
pub trait AssetSelector: Send + Sync {
    fn select(&self, library: &LockLibrary) -> Vec<String>;
}

impl<F> AssetSelector for F
where
    F: Fn(&LockLibrary) -> Vec<String> + Send + Sync,
{
    fn select(&self, library: &LockLibrary) -> Vec<String> {
        self(library)
    }
}

/// Picks managed and native assets for one runtime.
///
/// For each kind of asset the group for the nearest compatible RID wins;
/// runtime-independent groups are the last resort.
#[derive(Debug, Clone)]
pub struct RuntimeAssetSelector {
    /// RID fallback chain, nearest first
    chain: Vec<String>,
}

impl RuntimeAssetSelector {
    pub fn new(graph: &RuntimeGraph, runtime: Option<&str>) -> Self {
        Self {
            chain: runtime.map(|rid| graph.expand(rid)).unwrap_or_default(),
        }
    }

    fn nearest<'a>(
        &self,
        groups: &'a [AssetGroup],
        files: impl Fn(&'a AssetGroup) -> &'a [String],
    ) -> &'a [String] {
        for rid in &self.chain {
            let found = groups
                .iter()
                .filter(|g| g.rid.as_deref() == Some(rid.as_str()))
                .map(&files)
                .find(|f| !f.is_empty());
            if let Some(found) = found {
                return found;
            }
        }

        groups
            .iter()
            .filter(|g| g.rid.is_none())
            .map(&files)
            .find(|f| !f.is_empty())
            .unwrap_or(&[])
    }
}

impl AssetSelector for RuntimeAssetSelector {
    fn select(&self, library: &LockLibrary) -> Vec<String> {
        let runtime = self.nearest(&library.assets, |g| g.runtime.as_slice());
        let native = self.nearest(&library.assets, |g| g.native.as_slice());
        runtime.iter().chain(native).cloned().collect()
    }
}

/// Absolute asset paths per library, keyed by library name.
///
/// Every library must be present in one of the repositories.
pub async fn resolve_asset_paths<'a, I>(
    libraries: I,
    repositories: &RepositorySet,
    selector: &dyn AssetSelector,
) -> RestoreResult<BTreeMap<String, Vec<PathBuf>>>
where
    I: IntoIterator<Item = &'a LockLibrary>,
{
    let mut paths = BTreeMap::new();

    for library in libraries {
        let dir = repositories
            .locate(&library.name, &library.version)
            .await
            .ok_or_else(|| RestoreError::PackageNotFound {
                id: library.name.clone(),
                range: format!("[{}]", library.version),
            })?;

        let files = selector
            .select(library)
            .iter()
            .map(|relative| dir.join(relative))
            .collect();
        paths.insert(library.name.clone(), files);
    }

    Ok(paths)
}
