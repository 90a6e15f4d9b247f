//! Cache-aware resolution entry point

use super::request::{normalize_requests, PackageRequest};
use super::stale::is_stale;
use crate::cache::{resolve_cache_root, DiskCache, MemoryCache, MemoryCacheKey, VersionTuple};
use crate::config::Config;
use crate::engine::{
    RepositoryEngine, RestoreContext, RestoreEngine, RestoreSpec, SpecCustomizer, SpecDependency,
    RESTORE_PROJECT_NAME,
};
use crate::error::{RestoreError, RestoreResult};
use crate::lockfile::{full_closure, resolve_asset_paths, LockFile, LockLibrary, RuntimeAssetSelector};
use crate::repository::{LocalRepository, RepositorySet};
use crate::target::{RuntimeGraph, TargetFramework};
use crate::version::{PackageVersion, VersionRange};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type Requests = BTreeMap<String, VersionRange>;

/// Result of [`Resolver::try_restore`]
#[derive(Debug)]
pub enum RestoreOutcome {
    Restored(LockFile),
    /// Every request had an empty id
    NothingRequested,
    /// The caller cancelled the restore
    Cancelled,
}

/// Configures a [`Resolver`]
pub struct ResolverBuilder {
    framework: TargetFramework,
    runtime: Option<String>,
    global_packages: PathBuf,
    fallback_folders: Vec<PathBuf>,
    feeds: Vec<PathBuf>,
    engine: Option<Arc<dyn RestoreEngine>>,
    cache_dir: Option<PathBuf>,
    disk_cache_disabled: bool,
    customizer: Option<SpecCustomizer>,
}

impl ResolverBuilder {
    /// Builder seeded from the `[target]`, `[repositories]` and `[cache]` sections
    pub fn from_config(config: &Config) -> RestoreResult<Self> {
        let framework = TargetFramework::parse(&config.target.framework)?;

        Ok(Resolver::builder(framework, config.repositories.global_packages_dir())
            .runtime(config.target.runtime.clone())
            .fallback_folders(config.repositories.fallback_folders.iter().cloned())
            .feeds(config.repositories.feeds.iter().cloned())
            .cache_dir(config.cache.dir.clone())
            .disable_disk_cache(config.cache.disabled))
    }

    pub fn framework(mut self, framework: TargetFramework) -> Self {
        self.framework = framework;
        self
    }

    pub fn runtime(mut self, runtime: Option<String>) -> Self {
        self.runtime = runtime.filter(|rid| !rid.is_empty());
        self
    }

    pub fn global_packages(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_packages = dir.into();
        self
    }

    pub fn fallback_folders(mut self, folders: impl IntoIterator<Item = PathBuf>) -> Self {
        self.fallback_folders.extend(folders);
        self
    }

    /// Local feeds packages are installed from when no repository has them
    pub fn feeds(mut self, feeds: impl IntoIterator<Item = PathBuf>) -> Self {
        self.feeds.extend(feeds);
        self
    }

    pub fn engine(mut self, engine: Arc<dyn RestoreEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Explicit disk cache root; `None` keeps the environment/default lookup
    pub fn cache_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.cache_dir = dir;
        }
        self
    }

    pub fn disable_disk_cache(mut self, disabled: bool) -> Self {
        self.disk_cache_disabled = disabled;
        self
    }

    /// Hook run on every project descriptor before it reaches the engine
    pub fn customizer(mut self, customizer: SpecCustomizer) -> Self {
        self.customizer = Some(customizer);
        self
    }

    pub fn build(self) -> Resolver {
        let repositories = RepositorySet::new(self.global_packages, self.fallback_folders);
        let feeds = self.feeds.into_iter().map(LocalRepository::new).collect();

        let disk = resolve_cache_root(self.cache_dir.as_deref(), self.disk_cache_disabled)
            .map(|root| DiskCache::new(root, self.framework.clone(), self.runtime.clone()));
        match &disk {
            Some(disk) => debug!("Disk cache at {}", disk.root().display()),
            None => debug!("Disk cache disabled"),
        }

        Resolver {
            framework: self.framework,
            runtime: self.runtime,
            context: RestoreContext::new(repositories, feeds),
            engine: self.engine.unwrap_or_else(|| Arc::new(RepositoryEngine::new())),
            memory: MemoryCache::new(),
            disk,
            customizer: self.customizer,
            runtime_graph: OnceLock::new(),
        }
    }
}

/// Resolves package closures for one framework and runtime, caching them
/// in memory and on disk.
///
/// A resolver is shared freely between tasks; concurrent identical requests
/// may each run the engine, and their cache writes merge.
pub struct Resolver {
    framework: TargetFramework,
    runtime: Option<String>,
    context: RestoreContext,
    engine: Arc<dyn RestoreEngine>,
    memory: MemoryCache,
    disk: Option<DiskCache>,
    customizer: Option<SpecCustomizer>,
    runtime_graph: OnceLock<Arc<RuntimeGraph>>,
}

impl Resolver {
    pub fn builder(framework: TargetFramework, global_packages: impl Into<PathBuf>) -> ResolverBuilder {
        ResolverBuilder {
            framework,
            runtime: None,
            global_packages: global_packages.into(),
            fallback_folders: Vec::new(),
            feeds: Vec::new(),
            engine: None,
            cache_dir: None,
            disk_cache_disabled: false,
            customizer: None,
        }
    }

    pub fn framework(&self) -> &TargetFramework {
        &self.framework
    }

    pub fn runtime(&self) -> Option<&str> {
        self.runtime.as_deref()
    }

    pub fn repositories(&self) -> &RepositorySet {
        self.context.repositories()
    }

    pub fn disk_cache(&self) -> Option<&DiskCache> {
        self.disk.as_ref()
    }

    pub fn memory_cache(&self) -> &MemoryCache {
        &self.memory
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.engine_name()
    }

    /// Resolve the closure of `requests`, from cache when possible.
    ///
    /// Returns `Ok(None)` when no request names a package.
    pub async fn restore_if_needed(
        &self,
        cancel: &CancellationToken,
        requests: &[PackageRequest],
    ) -> RestoreResult<Option<LockFile>> {
        // A full cache hit never yields, so cancellation has to be seen here
        if cancel.is_cancelled() {
            return Err(RestoreError::Cancelled);
        }

        let requests = normalize_requests(requests)?;
        if requests.is_empty() {
            debug!("No packages requested");
            return Ok(None);
        }

        if let Some(lock) = self.probe_caches(&requests).await? {
            return Ok(Some(lock));
        }

        self.resolve(&requests, cancel).await.map(Some)
    }

    /// [`restore_if_needed`](Self::restore_if_needed) with cancellation
    /// reported as an outcome instead of an error
    pub async fn try_restore(
        &self,
        cancel: &CancellationToken,
        requests: &[PackageRequest],
    ) -> RestoreResult<RestoreOutcome> {
        match self.restore_if_needed(cancel, requests).await {
            Ok(Some(lock)) => Ok(RestoreOutcome::Restored(lock)),
            Ok(None) => Ok(RestoreOutcome::NothingRequested),
            Err(e) if e.is_cancelled() && cancel.is_cancelled() => {
                info!("Restore cancelled");
                Ok(RestoreOutcome::Cancelled)
            }
            Err(e) => Err(e),
        }
    }

    async fn probe_caches(&self, requests: &Requests) -> RestoreResult<Option<LockFile>> {
        if requests.values().any(VersionRange::is_floating) {
            debug!("Floating version requested, skipping caches");
            return Ok(None);
        }

        let (text, from_disk) = match self.probe_memory(requests) {
            Some(text) => (text.to_string(), false),
            None => match self.probe_disk(requests).await? {
                Some(text) => (text, true),
                None => return Ok(None),
            },
        };

        let lock = LockFile::parse(&text)?;
        if is_stale(&lock, requests, self.context.repositories()).await {
            debug!("Cached closure is stale, resolving again");
            return Ok(None);
        }

        if from_disk {
            self.remember(requests, &lock, &text);
        }
        Ok(Some(lock))
    }

    fn probe_memory(&self, requests: &Requests) -> Option<Arc<str>> {
        let key = MemoryCacheKey::new(requests.keys());
        if key.len() != requests.len() {
            debug!("Request ids differ only by case, skipping memory cache");
            return None;
        }

        let found = if let Some((id, range)) = single(requests) {
            self.memory
                .find_single(&key, range)
                .map(|(version, text)| (format!("{} {}", id, version), text))
        } else {
            let ranges = aligned_ranges(&key, requests)?;
            self.memory
                .find_matching(&key, &ranges)
                .map(|(versions, text)| (describe(key.ids(), &versions), text))
        };

        match found {
            Some((what, text)) => {
                debug!("Memory cache hit for {}", what);
                Some(text)
            }
            None => {
                debug!("Memory cache miss for {}", key.ids().join(", "));
                None
            }
        }
    }

    async fn probe_disk(&self, requests: &Requests) -> RestoreResult<Option<String>> {
        let Some(disk) = &self.disk else {
            return Ok(None);
        };
        let Some((id, range)) = single(requests) else {
            debug!("Disk cache holds single packages only, skipping for {} packages", requests.len());
            return Ok(None);
        };

        match disk.read(id, range).await? {
            Some((version, text)) => {
                debug!("Disk cache hit for {} {}", id, version);
                Ok(Some(text))
            }
            None => {
                debug!("Disk cache miss for {} {}", id, range);
                Ok(None)
            }
        }
    }

    async fn resolve(&self, requests: &Requests, cancel: &CancellationToken) -> RestoreResult<LockFile> {
        let spec = self.build_spec(requests);
        info!(
            "Resolving {} package(s) for {} with the {} engine",
            spec.dependencies.len(),
            self.framework,
            self.engine.engine_name()
        );

        let lock = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RestoreError::Cancelled),
            result = self.engine.restore(&spec, &self.context, cancel) => result?,
        };
        let text = lock.to_canonical_string()?;

        if let Some(disk) = &self.disk {
            if let Some((id, range)) = single(requests).filter(|(_, r)| !r.is_floating()) {
                if let Some(version) = lock.resolved_version(id).filter(|v| range.satisfies(v)) {
                    if disk.write(id, version, &text).await? {
                        debug!("Stored {} {} in disk cache", id, version);
                    }
                }
            }
        }
        self.remember(requests, &lock, &text);

        Ok(lock)
    }

    fn build_spec(&self, requests: &Requests) -> RestoreSpec {
        let mut spec = RestoreSpec {
            name: RESTORE_PROJECT_NAME.to_string(),
            framework: self.framework.clone(),
            runtime: self.runtime.clone(),
            dependencies: requests
                .iter()
                .map(|(id, range)| SpecDependency {
                    id: id.clone(),
                    range: range.clone(),
                })
                .collect(),
            metadata: BTreeMap::new(),
        };
        if let Some(customize) = &self.customizer {
            customize(&mut spec);
        }
        spec
    }

    /// Merge a closure into the memory cache when its request set is cacheable
    fn remember(&self, requests: &Requests, lock: &LockFile, text: &str) {
        if requests.values().any(VersionRange::is_floating) {
            return;
        }
        let key = MemoryCacheKey::new(requests.keys());
        if key.len() != requests.len() {
            return;
        }

        let versions: Option<VersionTuple> = key
            .ids()
            .iter()
            .map(|id| lock.resolved_version(id).cloned())
            .collect();
        match versions {
            Some(versions) => {
                debug!("Stored {} in memory cache", describe(key.ids(), &versions));
                self.memory.merge(&key, versions, Arc::from(text));
            }
            None => debug!("Closure is missing a requested package, not caching"),
        }
    }

    /// Runtime graph from the repositories, loaded on first use
    pub fn runtime_graph(&self) -> RestoreResult<Arc<RuntimeGraph>> {
        if let Some(graph) = self.runtime_graph.get() {
            return Ok(Arc::clone(graph));
        }
        let graph = Arc::new(RuntimeGraph::load_from_roots(
            self.context.repositories().roots(),
        )?);
        Ok(Arc::clone(self.runtime_graph.get_or_init(|| graph)))
    }

    /// Absolute asset paths for the closure of `roots`, or of every library
    /// when `roots` is empty
    pub async fn asset_paths(
        &self,
        lock: &LockFile,
        roots: &[String],
    ) -> RestoreResult<BTreeMap<String, Vec<PathBuf>>> {
        let graph = self.runtime_graph()?;
        let runtime = lock.target.runtime.as_deref().or(self.runtime.as_deref());
        if let Some(rid) = runtime.filter(|rid| !graph.contains(rid)) {
            warn!("Runtime {} is not in the runtime graph, only its own assets match", rid);
        }
        let selector = RuntimeAssetSelector::new(&graph, runtime);

        let libraries: Vec<&LockLibrary> = if roots.is_empty() {
            lock.libraries.iter().collect()
        } else {
            full_closure(lock, roots)
        };
        resolve_asset_paths(libraries, self.context.repositories(), &selector).await
    }

    /// Scratch directory engines stage installs in
    pub fn scratch_dir(&self) -> &Path {
        self.context.scratch_dir()
    }
}

/// The only request, when exactly one package is requested
fn single(requests: &Requests) -> Option<(&String, &VersionRange)> {
    match requests.len() {
        1 => requests.iter().next(),
        _ => None,
    }
}

/// Ranges reordered to follow the key's sorted, lower-cased ids
fn aligned_ranges<'a>(key: &MemoryCacheKey, requests: &'a Requests) -> Option<Vec<&'a VersionRange>> {
    let by_lower: HashMap<String, &VersionRange> = requests
        .iter()
        .map(|(id, range)| (id.to_lowercase(), range))
        .collect();
    key.ids().iter().map(|id| by_lower.get(id).copied()).collect()
}

fn describe(ids: &[String], versions: &[PackageVersion]) -> String {
    ids.iter()
        .zip(versions)
        .map(|(id, version)| format!("{} {}", id, version))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{manifest, write_package};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Engine that counts calls and remembers the last descriptor
    #[derive(Default)]
    struct CountingEngine {
        inner: RepositoryEngine,
        calls: AtomicUsize,
        last_spec: Mutex<Option<RestoreSpec>>,
    }

    impl CountingEngine {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RestoreEngine for CountingEngine {
        async fn restore(
            &self,
            spec: &RestoreSpec,
            context: &RestoreContext,
            cancel: &CancellationToken,
        ) -> RestoreResult<LockFile> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_spec.lock().unwrap() = Some(spec.clone());
            self.inner.restore(spec, context, cancel).await
        }

        fn engine_name(&self) -> &'static str {
            "counting"
        }
    }

    /// Engine that never finishes on its own
    struct HangingEngine;

    #[async_trait]
    impl RestoreEngine for HangingEngine {
        async fn restore(
            &self,
            _spec: &RestoreSpec,
            _context: &RestoreContext,
            _cancel: &CancellationToken,
        ) -> RestoreResult<LockFile> {
            std::future::pending().await
        }

        fn engine_name(&self) -> &'static str {
            "hanging"
        }
    }

    struct Fixture {
        packages: TempDir,
        cache: TempDir,
        engine: Arc<CountingEngine>,
    }

    impl Fixture {
        fn new() -> Self {
            let packages = TempDir::new().unwrap();
            write_package(packages.path(), &manifest("Foo", "1.0.0", &[("Bar", "1.0")]));
            write_package(packages.path(), &manifest("Foo", "2.0.0", &[("Bar", "1.0")]));
            write_package(packages.path(), &manifest("Bar", "1.0.0", &[]));
            write_package(packages.path(), &manifest("Bar", "2.0.0", &[]));

            Self {
                packages,
                cache: TempDir::new().unwrap(),
                engine: Arc::new(CountingEngine::default()),
            }
        }

        fn builder(&self) -> ResolverBuilder {
            Resolver::builder(TargetFramework::new("netcoreapp", "3.1"), self.packages.path())
                .runtime(Some("win-x64".to_string()))
                .engine(self.engine.clone())
                .cache_dir(Some(self.cache.path().to_path_buf()))
        }

        fn resolver(&self) -> Resolver {
            self.builder().build()
        }
    }

    fn req(pairs: &[(&str, &str)]) -> Vec<PackageRequest> {
        pairs.iter().map(|(id, v)| PackageRequest::new(*id, *v)).collect()
    }

    async fn restore(resolver: &Resolver, pairs: &[(&str, &str)]) -> LockFile {
        resolver
            .restore_if_needed(&CancellationToken::new(), &req(pairs))
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn second_call_served_from_memory() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();

        let first = restore(&resolver, &[("Foo", "1.0.0")]).await;
        let second = restore(&resolver, &[("Foo", "1.0.0")]).await;

        assert_eq!(fixture.engine.calls(), 1);
        assert_eq!(
            first.to_canonical_string().unwrap(),
            second.to_canonical_string().unwrap()
        );
        assert_eq!(resolver.memory_cache().len(), 1);
    }

    #[tokio::test]
    async fn disk_cache_shared_between_resolvers() {
        let fixture = Fixture::new();
        let first = restore(&fixture.resolver(), &[("Foo", "1.0.0")]).await;

        let path = fixture
            .cache
            .path()
            .join("netcoreapp/3.1/win-x64/foo/1.0.0");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            first.to_canonical_string().unwrap()
        );

        let other = fixture.resolver();
        let second = restore(&other, &[("Foo", "1.0.0")]).await;
        assert_eq!(fixture.engine.calls(), 1);
        assert_eq!(first, second);
        // disk hits warm the memory tier
        assert_eq!(other.memory_cache().len(), 1);
    }

    #[tokio::test]
    async fn range_request_reads_highest_disk_entry() {
        let fixture = Fixture::new();
        restore(&fixture.resolver(), &[("Foo", "1.0.0")]).await;
        restore(&fixture.resolver(), &[("Foo", "2.0.0")]).await;
        assert_eq!(fixture.engine.calls(), 2);

        let lock = restore(&fixture.resolver(), &[("Foo", "[1.0, 3.0)")]).await;
        assert_eq!(fixture.engine.calls(), 2);
        assert_eq!(lock.resolved_version("Foo"), Some(&PackageVersion::new(2, 0, 0)));
    }

    #[tokio::test]
    async fn unsatisfying_memory_entry_is_a_miss() {
        let fixture = Fixture::new();
        let resolver = fixture.builder().disable_disk_cache(true).build();

        restore(&resolver, &[("Foo", "1.0.0")]).await;
        let lock = restore(&resolver, &[("Foo", "[2.0, )")]).await;

        assert_eq!(fixture.engine.calls(), 2);
        assert_eq!(lock.resolved_version("Foo"), Some(&PackageVersion::new(2, 0, 0)));
    }

    #[tokio::test]
    async fn multiple_packages_cached_in_memory_only() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();

        restore(&resolver, &[("Foo", "1.0.0"), ("Bar", "2.0.0")]).await;
        let lock = restore(&resolver, &[("bar", "2.0.0"), ("Foo", "1.0.0")]).await;

        assert_eq!(fixture.engine.calls(), 1);
        assert_eq!(lock.resolved_version("Bar"), Some(&PackageVersion::new(2, 0, 0)));
        assert!(DiskCache::list(fixture.cache.path()).await.unwrap().is_empty());

        let fresh = fixture.resolver();
        restore(&fresh, &[("Foo", "1.0.0"), ("Bar", "2.0.0")]).await;
        assert_eq!(fixture.engine.calls(), 2);
    }

    #[tokio::test]
    async fn floating_requests_skip_caches() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();

        let lock = restore(&resolver, &[("Foo", "")]).await;
        restore(&resolver, &[("Foo", "2.*")]).await;

        assert_eq!(fixture.engine.calls(), 2);
        assert_eq!(lock.resolved_version("Foo"), Some(&PackageVersion::new(2, 0, 0)));
        assert!(resolver.memory_cache().is_empty());
        assert!(DiskCache::list(fixture.cache.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stale_hit_resolves_again() {
        let global = TempDir::new().unwrap();
        let feed = TempDir::new().unwrap();
        write_package(feed.path(), &manifest("Foo", "1.0.0", &[]));
        let engine = Arc::new(CountingEngine::default());
        let resolver = Resolver::builder(TargetFramework::new("net", "8.0"), global.path())
            .feeds([feed.path().to_path_buf()])
            .engine(engine.clone())
            .disable_disk_cache(true)
            .build();

        restore(&resolver, &[("Foo", "1.0.0")]).await;
        let installed = global.path().join("foo").join("1.0.0");
        assert!(installed.is_dir());

        std::fs::remove_dir_all(&installed).unwrap();
        restore(&resolver, &[("Foo", "1.0.0")]).await;

        assert_eq!(engine.calls(), 2);
        assert!(installed.is_dir());
    }

    #[tokio::test]
    async fn empty_request_set_returns_none() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();

        let result = resolver
            .restore_if_needed(&CancellationToken::new(), &req(&[("", "1.0.0")]))
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(fixture.engine.calls(), 0);

        let outcome = resolver.try_restore(&CancellationToken::new(), &[]).await.unwrap();
        assert!(matches!(outcome, RestoreOutcome::NothingRequested));
    }

    #[tokio::test]
    async fn cancellation_checked_before_cache_hit() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();
        restore(&resolver, &[("Foo", "1.0.0")]).await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = resolver.restore_if_needed(&cancel, &req(&[("Foo", "1.0.0")])).await;
        assert!(matches!(result, Err(RestoreError::Cancelled)));

        let outcome = resolver.try_restore(&cancel, &req(&[("Foo", "1.0.0")])).await.unwrap();
        assert!(matches!(outcome, RestoreOutcome::Cancelled));
    }

    #[tokio::test]
    async fn cancellation_interrupts_engine() {
        let packages = TempDir::new().unwrap();
        let resolver = Resolver::builder(TargetFramework::new("net", "8.0"), packages.path())
            .engine(Arc::new(HangingEngine))
            .disable_disk_cache(true)
            .build();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let outcome = resolver.try_restore(&cancel, &req(&[("Foo", "1.0.0")])).await.unwrap();
        assert!(matches!(outcome, RestoreOutcome::Cancelled));
    }

    #[tokio::test]
    async fn resolution_failure_propagates() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();
        let result = resolver
            .try_restore(&CancellationToken::new(), &req(&[("Missing", "1.0.0")]))
            .await;
        assert!(matches!(result, Err(RestoreError::PackageNotFound { .. })));
    }

    #[tokio::test]
    async fn customizer_sees_every_descriptor() {
        let fixture = Fixture::new();
        let customized = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&customized);
        let resolver = fixture
            .builder()
            .customizer(Arc::new(move |spec: &mut RestoreSpec| {
                counter.fetch_add(1, Ordering::SeqCst);
                spec.metadata.insert("origin".to_string(), "test".to_string());
            }))
            .build();

        restore(&resolver, &[("Foo", "1.0.0"), ("Bar", "1.0.0")]).await;

        assert_eq!(customized.load(Ordering::SeqCst), 1);
        let spec = fixture.engine.last_spec.lock().unwrap().clone().unwrap();
        assert_eq!(spec.name, RESTORE_PROJECT_NAME);
        assert_eq!(spec.metadata["origin"], "test");
        let ids: Vec<&str> = spec.dependencies.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["Bar", "Foo"]);
    }

    #[tokio::test]
    async fn asset_paths_for_closure() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver();
        let lock = restore(&resolver, &[("Foo", "1.0.0")]).await;

        let all = resolver.asset_paths(&lock, &[]).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(
            all["Foo"],
            vec![fixture.packages.path().join("foo/1.0.0/lib/Foo.dll")]
        );

        let only_bar = resolver.asset_paths(&lock, &["Bar".to_string()]).await.unwrap();
        assert_eq!(only_bar.keys().collect::<Vec<_>>(), vec!["Bar"]);

        let graph = resolver.runtime_graph().unwrap();
        assert!(Arc::ptr_eq(&graph, &resolver.runtime_graph().unwrap()));
    }
}
