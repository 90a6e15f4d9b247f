//! Assets command - map lock file libraries to files on disk

use super::{read_lock_file, resolver_builder};
use crate::cli::args::{AssetsArgs, OutputFormat};
use crate::config::Config;
use crate::error::RestoreResult;
use crate::ui::{self, UiContext};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Execute the assets command
pub async fn execute(args: AssetsArgs, config: &Config) -> RestoreResult<()> {
    let lock = read_lock_file(&args.lock_file).await?;

    // Only the repositories are consulted; nothing is resolved or cached
    let resolver = resolver_builder(config, &args.repositories)?
        .disable_disk_cache(true)
        .build();
    let paths = resolver.asset_paths(&lock, &args.roots).await?;
    if paths.values().all(Vec::is_empty) {
        ui::step_info(
            &UiContext::detect(),
            &format!("No assets for {}", resolver.runtime().unwrap_or("portable")),
        );
    }

    print_assets(&paths, args.format)
}

fn print_assets(paths: &BTreeMap<String, Vec<PathBuf>>, format: OutputFormat) -> RestoreResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(paths)?),
        OutputFormat::Text => {
            for (library, files) in paths {
                println!("{}", library);
                for file in files {
                    println!("  {}", file.display());
                }
            }
        }
    }
    Ok(())
}
