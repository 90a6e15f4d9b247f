//! Default engine resolving against local repositories and feeds

use super::{RestoreContext, RestoreEngine, RestoreSpec};
use crate::error::{RestoreError, RestoreResult};
use crate::lockfile::{LockDependency, LockFile, LockLibrary};
use crate::repository::{is_valid_package_id, PackageManifest};
use crate::version::VersionRange;
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Breadth-first resolver.
///
/// Direct dependencies take the preferred match of their range (newest
/// for floating ranges, lowest otherwise). Transitive dependencies take
/// the lowest applicable version, and the first (nearest) selection of a
/// package is final: a later range it does not satisfy is a conflict.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryEngine;

struct Pending {
    id: String,
    range: VersionRange,
    required_by: String,
}

impl RepositoryEngine {
    pub fn new() -> Self {
        Self
    }

    async fn select(
        &self,
        request: &Pending,
        context: &RestoreContext,
    ) -> RestoreResult<Arc<PackageManifest>> {
        let versions = context.available_versions(&request.id).await?;
        let version = request
            .range
            .find_best_match(&versions)
            .ok_or_else(|| RestoreError::PackageNotFound {
                id: request.id.clone(),
                range: request.range.to_string(),
            })?;

        context
            .manifest(&request.id, version)
            .await?
            .ok_or_else(|| RestoreError::PackageNotFound {
                id: request.id.clone(),
                range: request.range.to_string(),
            })
    }
}

fn to_library(manifest: &PackageManifest) -> RestoreResult<LockLibrary> {
    let dependencies = manifest
        .dependencies
        .iter()
        .map(|dep| {
            Ok(LockDependency {
                id: dep.id.clone(),
                range: parse_manifest_range(manifest, &dep.range)?,
            })
        })
        .collect::<RestoreResult<Vec<_>>>()?;

    Ok(LockLibrary {
        name: manifest.id.clone(),
        version: manifest.version.clone(),
        dependencies,
        assets: manifest.assets.clone(),
    })
}

fn parse_manifest_range(manifest: &PackageManifest, range: &str) -> RestoreResult<VersionRange> {
    VersionRange::parse_dependency(range).map_err(|e| {
        RestoreError::Resolution(format!(
            "{} {} declares an invalid dependency range: {}",
            manifest.id, manifest.version, e
        ))
    })
}

#[async_trait]
impl RestoreEngine for RepositoryEngine {
    async fn restore(
        &self,
        spec: &RestoreSpec,
        context: &RestoreContext,
        cancel: &CancellationToken,
    ) -> RestoreResult<LockFile> {
        let mut queue: VecDeque<Pending> = spec
            .dependencies
            .iter()
            .map(|dep| Pending {
                id: dep.id.clone(),
                range: dep.range.clone(),
                required_by: spec.name.clone(),
            })
            .collect();

        // keyed by lower-cased id so the output is sorted and case-insensitive
        let mut selected: BTreeMap<String, Arc<PackageManifest>> = BTreeMap::new();

        while let Some(request) = queue.pop_front() {
            if cancel.is_cancelled() {
                return Err(RestoreError::Cancelled);
            }

            if !is_valid_package_id(&request.id) {
                return Err(RestoreError::Resolution(format!(
                    "invalid package id '{}' (required by {})",
                    request.id, request.required_by
                )));
            }

            let key = request.id.to_lowercase();
            if let Some(existing) = selected.get(&key) {
                if request.range.satisfies(&existing.version) {
                    continue;
                }
                return Err(RestoreError::VersionConflict {
                    id: request.id,
                    selected: existing.version.to_string(),
                    range: request.range.to_string(),
                    required_by: request.required_by,
                });
            }

            let manifest = self.select(&request, context).await?;
            debug!(
                "Selected {} {} for {} (required by {})",
                manifest.id, manifest.version, request.range, request.required_by
            );

            for dep in &manifest.dependencies {
                queue.push_back(Pending {
                    id: dep.id.clone(),
                    range: parse_manifest_range(&manifest, &dep.range)?,
                    required_by: format!("{} {}", manifest.id, manifest.version),
                });
            }
            selected.insert(key, manifest);
        }

        let mut lock = LockFile::new(&spec.framework, spec.runtime.as_deref());
        for manifest in selected.values() {
            if cancel.is_cancelled() {
                return Err(RestoreError::Cancelled);
            }
            context
                .ensure_installed(&manifest.id, &manifest.version)
                .await?;
            lock.libraries.push(to_library(manifest)?);
        }

        info!(
            "Resolved {} package(s) for {}",
            lock.libraries.len(),
            spec.framework
        );
        Ok(lock)
    }

    fn engine_name(&self) -> &'static str {
        "repository"
    }
}
