//! CLI command implementations

pub mod assets;
pub mod cache;
pub mod closure;
pub mod config;
pub mod restore;

pub use assets::execute as assets;
pub use cache::execute as cache;
pub use closure::execute as closure;
pub use config::execute as config;
pub use restore::execute as restore;

use crate::cli::args::RepositoryArgs;
use crate::config::Config;
use crate::error::{RestoreError, RestoreResult};
use crate::lockfile::LockFile;
use crate::restore::ResolverBuilder;
use crate::target::TargetFramework;
use std::path::Path;
use tokio::fs;

/// Resolver builder from config with command-line overrides applied
fn resolver_builder(config: &Config, overrides: &RepositoryArgs) -> RestoreResult<ResolverBuilder> {
    let mut builder = ResolverBuilder::from_config(config)?;

    if let Some(framework) = &overrides.framework {
        builder = builder.framework(TargetFramework::parse(framework)?);
    }
    if overrides.runtime.is_some() {
        builder = builder.runtime(overrides.runtime.clone());
    }
    if let Some(packages) = &overrides.packages {
        builder = builder.global_packages(packages.clone());
    }

    Ok(builder
        .fallback_folders(overrides.fallback_folders.iter().cloned())
        .feeds(overrides.feeds.iter().cloned()))
}

async fn read_lock_file(path: &Path) -> RestoreResult<LockFile> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| RestoreError::io(format!("reading lock file {}", path.display()), e))?;
    LockFile::parse(&text)
}
