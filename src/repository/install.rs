//! Copy packages from a feed into the global packages folder

use super::LocalRepository;
use crate::error::{RestoreError, RestoreResult};
use crate::version::PackageVersion;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

/// Install `id` at `version` from `feed` into `target`.
///
/// The package is staged under `scratch_dir` and renamed into place, so a
/// concurrent reader never sees a half-copied package directory. Returns
/// the installed directory.
pub async fn install_package(
    feed: &LocalRepository,
    target: &LocalRepository,
    id: &str,
    version: &PackageVersion,
    scratch_dir: &Path,
) -> RestoreResult<PathBuf> {
    let destination = target.package_path(id, version);
    if is_dir(&destination).await {
        return Ok(destination);
    }

    let source = feed.package_path(id, version);
    let staging = scratch_dir.join(format!("{}-{}", id.to_lowercase(), uuid::Uuid::new_v4()));

    let (from, to) = (source.clone(), staging.clone());
    tokio::task::spawn_blocking(move || copy_tree(&from, &to))
        .await
        .map_err(|e| RestoreError::Internal(format!("install task failed: {}", e)))??;

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| RestoreError::io(format!("creating {}", parent.display()), e))?;
    }

    match fs::rename(&staging, &destination).await {
        Ok(()) => {
            debug!(
                "Installed {} {} from {} into {}",
                id,
                version,
                feed.root().display(),
                destination.display()
            );
        }
        Err(e) => {
            if !is_dir(&destination).await {
                return Err(RestoreError::io(
                    format!("moving {} into {}", staging.display(), destination.display()),
                    e,
                ));
            }
            // Another restore installed it first
            fs::remove_dir_all(&staging).await.map_err(|e| {
                RestoreError::io(format!("removing staging dir {}", staging.display()), e)
            })?;
        }
    }

    Ok(destination)
}

async fn is_dir(path: &Path) -> bool {
    matches!(fs::metadata(path).await, Ok(meta) if meta.is_dir())
}

fn copy_tree(source: &Path, destination: &Path) -> RestoreResult<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| {
            RestoreError::io(
                format!("walking {}", source.display()),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
            )
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| RestoreError::Internal(e.to_string()))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .map_err(|e| RestoreError::io(format!("creating {}", target.display()), e))?;
        } else {
            std::fs::copy(entry.path(), &target)
                .map_err(|e| RestoreError::io(format!("copying to {}", target.display()), e))?;
        }
    }
    Ok(())
}
