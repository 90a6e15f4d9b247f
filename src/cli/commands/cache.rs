//! Cache command - manage the lock file disk cache

use crate::cache::{resolve_cache_root, DiskCache, DiskCacheEntry};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::{RestoreError, RestoreResult};
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> RestoreResult<()> {
    let explicit = args.cache_dir.as_deref().or(config.cache.dir.as_deref());
    let root = resolve_cache_root(explicit, false).ok_or_else(|| {
        RestoreError::User("Could not determine a cache directory; set cache.dir".to_string())
    })?;
    debug!("Disk cache root: {}", root.display());

    match args.action {
        CacheAction::Path => show_path(&root, config),
        CacheAction::List { format } => list_entries(&root, format).await,
        CacheAction::Clear { yes } => clear_entries(&root, yes).await,
    }
}

fn show_path(root: &Path, config: &Config) -> RestoreResult<()> {
    println!("{}", root.display());
    if config.cache.disabled {
        ui::step_warn_hint(
            &UiContext::detect(),
            "The disk cache is disabled",
            "Run: pkgrestore config set cache.disabled false",
        );
    }
    Ok(())
}

async fn list_entries(root: &Path, format: OutputFormat) -> RestoreResult<()> {
    let entries = DiskCache::list(root).await?;

    match format {
        OutputFormat::Json => print_entries_json(&entries)?,
        OutputFormat::Text if entries.is_empty() => println!("No cached lock files found."),
        OutputFormat::Text => print_entries_table(&entries),
    }
    Ok(())
}

fn print_entries_table(entries: &[DiskCacheEntry]) {
    println!(
        "{:<36} {:<16} {:<20} {:<16} {:<16}",
        "PACKAGE", "VERSION", "FRAMEWORK", "RUNTIME", "MODIFIED"
    );
    println!("{}", "-".repeat(108));

    for entry in entries {
        let modified = entry
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<36} {:<16} {:<20} {:<16} {:<16}",
            entry.package,
            entry.version,
            format!("{}{}", entry.framework, entry.framework_version),
            entry.runtime,
            style(modified).dim()
        );
    }

    println!();
    println!("Total: {} cached lock file(s)", entries.len());
}

fn print_entries_json(entries: &[DiskCacheEntry]) -> RestoreResult<()> {
    #[derive(Serialize)]
    struct EntryJson<'a> {
        package: &'a str,
        version: &'a str,
        framework: String,
        runtime: &'a str,
        path: &'a PathBuf,
        modified: Option<String>,
    }

    let json: Vec<EntryJson> = entries
        .iter()
        .map(|e| EntryJson {
            package: &e.package,
            version: &e.version,
            framework: format!("{}{}", e.framework, e.framework_version),
            runtime: &e.runtime,
            path: &e.path,
            modified: e.modified.map(|m| m.to_rfc3339()),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn clear_entries(root: &Path, skip_confirm: bool) -> RestoreResult<()> {
    let ctx = UiContext::detect().with_auto_yes(skip_confirm);
    let entries = DiskCache::list(root).await?;

    if entries.is_empty() {
        println!("No cached lock files to clear.");
        return Ok(());
    }

    let prompt = format!(
        "Delete {} cached lock file(s) under {}?",
        entries.len(),
        root.display()
    );
    if !ui::confirm(&ctx, &prompt, false).await? {
        ui::step_warn_hint(&ctx, "Aborted", "Pass --yes to clear without prompting");
        return Ok(());
    }

    DiskCache::clear(root).await?;
    ui::step_ok(&ctx, &format!("Cleared {} cached lock file(s)", entries.len()));
    Ok(())
}
