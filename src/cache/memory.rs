//! In-process lock file cache

use crate::version::{PackageVersion, VersionRange};
use arc_swap::ArcSwap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// One resolved version per key id, in key order
pub type VersionTuple = Vec<PackageVersion>;

type Entries = BTreeMap<VersionTuple, Arc<str>>;

/// Sorted, lower-cased ids of a request set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoryCacheKey(Vec<String>);

impl MemoryCacheKey {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(|id| id.as_ref().to_lowercase()).collect();
        ids.sort();
        ids.dedup();
        Self(ids)
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lock-free map from request id set to every cached resolution of it.
///
/// Readers load a snapshot; writers clone, merge and swap with retry, so
/// concurrent merges into the same key keep each other's entries.
/// Entries are never evicted.
pub struct MemoryCache {
    map: ArcSwap<HashMap<MemoryCacheKey, Arc<Entries>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            map: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Newest cached resolution of a single-id key, if it satisfies `range`
    pub fn find_single(
        &self,
        key: &MemoryCacheKey,
        range: &VersionRange,
    ) -> Option<(PackageVersion, Arc<str>)> {
        let snapshot = self.map.load();
        let entries = snapshot.get(key)?;
        let (versions, text) = entries.iter().next_back()?;
        let version = versions.first()?;

        range
            .satisfies(version)
            .then(|| (version.clone(), Arc::clone(text)))
    }

    /// First cached resolution whose every version satisfies the matching range.
    ///
    /// `ranges` are aligned with `key.ids()`.
    pub fn find_matching(
        &self,
        key: &MemoryCacheKey,
        ranges: &[&VersionRange],
    ) -> Option<(VersionTuple, Arc<str>)> {
        let snapshot = self.map.load();
        let entries = snapshot.get(key)?;

        entries
            .iter()
            .find(|(versions, _)| {
                versions.len() == ranges.len()
                    && versions.iter().zip(ranges).all(|(v, r)| r.satisfies(v))
            })
            .map(|(versions, text)| (versions.clone(), Arc::clone(text)))
    }

    /// Insert a resolution, keeping whatever else is cached under `key`
    pub fn merge(&self, key: &MemoryCacheKey, versions: VersionTuple, text: Arc<str>) {
        self.map.rcu(|current| {
            let mut next = HashMap::clone(current);
            let mut entries = next.get(key).map(|e| Entries::clone(e)).unwrap_or_default();
            entries.insert(versions.clone(), Arc::clone(&text));
            next.insert(key.clone(), Arc::new(entries));
            next
        });
    }

    /// Number of cached resolutions across all keys
    pub fn len(&self) -> usize {
        self.map.load().values().map(|e| e.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}
