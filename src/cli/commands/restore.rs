//! Restore command - resolve packages into a lock file

use super::resolver_builder;
use crate::cli::args::{OutputFormat, RestoreArgs};
use crate::config::Config;
use crate::error::{RestoreError, RestoreResult};
use crate::lockfile::LockFile;
use crate::restore::{PackageRequest, RestoreOutcome};
use crate::ui::{self, TaskSpinner, UiContext};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Execute the restore command
pub async fn execute(args: RestoreArgs, config: &Config) -> RestoreResult<()> {
    let ctx = UiContext::detect();

    let requests = args
        .packages
        .iter()
        .map(|p| PackageRequest::parse(p))
        .collect::<RestoreResult<Vec<_>>>()?;

    let resolver = resolver_builder(config, &args.repositories)?
        .cache_dir(args.cache_dir.clone())
        .disable_disk_cache(config.cache.disabled || args.no_disk_cache)
        .build();

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling restore");
            interrupt.cancel();
        }
    });

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!(
        "Restoring {} package(s) for {}...",
        requests.len(),
        resolver.framework()
    ));
    let outcome = resolver.try_restore(&cancel, &requests).await;
    ctrl_c.abort();

    let lock = match outcome {
        Ok(RestoreOutcome::Restored(lock)) => {
            spinner.stop(&format!("Restored {} libraries", lock.libraries.len()));
            lock
        }
        Ok(RestoreOutcome::NothingRequested) => {
            spinner.stop_warn("Nothing to restore");
            return Ok(());
        }
        Ok(RestoreOutcome::Cancelled) => {
            spinner.stop_warn("Restore cancelled");
            return Err(RestoreError::Cancelled);
        }
        Err(e) => {
            spinner.stop_error("Restore failed");
            return Err(e);
        }
    };

    if let Some(path) = &args.output {
        fs::write(path, lock.to_canonical_string()?)
            .await
            .map_err(|e| RestoreError::io(format!("writing lock file {}", path.display()), e))?;
        ui::step_ok_detail(&ctx, "Wrote lock file", &path.display().to_string());
    }

    print_lock(&lock, args.format)
}

fn print_lock(lock: &LockFile, format: OutputFormat) -> RestoreResult<()> {
    match format {
        OutputFormat::Json => print!("{}", lock.to_canonical_string()?),
        OutputFormat::Text => {
            for library in &lock.libraries {
                println!("{} {}", library.name, library.version);
            }
        }
    }
    Ok(())
}
