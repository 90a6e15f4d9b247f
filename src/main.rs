//! pkgrestore - cached package restore
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use pkgrestore::cli::{Cli, Commands};
use pkgrestore::config::{Config, ConfigManager};
use pkgrestore::error::{RestoreError, RestoreResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        // Already reported by the command
        Err(e) if e.is_cancelled() => ExitCode::from(130),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> RestoreResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    // Find local config unless --no-local is set
    let local_config_path = if cli.no_local {
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| RestoreError::io("getting current directory", e))?;
        ConfigManager::find_local_config(&cwd)
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    init_logging(cli.verbose, &config);
    match &local_config_path {
        Some(path) => debug!("Using local config: {}", path.display()),
        None if cli.no_local => debug!("Local config discovery disabled (--no-local)"),
        None => {}
    }

    match cli.command {
        Commands::Restore(args) => pkgrestore::cli::commands::restore(args, &config).await,
        Commands::Closure(args) => pkgrestore::cli::commands::closure(args).await,
        Commands::Assets(args) => pkgrestore::cli::commands::assets(args, &config).await,
        Commands::Cache(args) => pkgrestore::cli::commands::cache(args, &config).await,
        Commands::Config(args) => {
            pkgrestore::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// Logging: 0 = warn, 1 = info, 2+ = debug; `general.verbose` counts as one -v
fn init_logging(verbose: u8, config: &Config) {
    let level = verbose.saturating_add(u8::from(config.general.verbose));
    let filter = match level {
        0 => EnvFilter::new("pkgrestore=warn"),
        1 => EnvFilter::new("pkgrestore=info"),
        _ => EnvFilter::new("pkgrestore=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
