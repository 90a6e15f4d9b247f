//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pkgrestore - cached package restore
///
/// Resolves the full dependency closure of a set of packages for one
/// target framework and runtime, caching the resulting lock files in
/// memory and on disk.
#[derive(Parser, Debug)]
#[command(name = "pkgrestore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PKGRESTORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .pkgrestore.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve packages into a lock file, using the caches when possible
    Restore(RestoreArgs),

    /// Print the libraries reachable from root packages of a lock file
    Closure(ClosureArgs),

    /// Print absolute asset paths for the libraries of a lock file
    Assets(AssetsArgs),

    /// Manage the lock file disk cache
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Repository overrides shared by commands that read packages
#[derive(Args, Debug, Default, Clone)]
pub struct RepositoryArgs {
    /// Global packages folder (overrides repositories.global_packages)
    #[arg(id = "packages_dir", long = "packages", value_name = "DIR")]
    pub packages: Option<PathBuf>,

    /// Additional fallback folder (repeatable)
    #[arg(long = "fallback", value_name = "DIR")]
    pub fallback_folders: Vec<PathBuf>,

    /// Additional local feed to install packages from (repeatable)
    #[arg(long = "feed", value_name = "DIR")]
    pub feeds: Vec<PathBuf>,

    /// Target framework moniker (overrides target.framework)
    #[arg(short, long)]
    pub framework: Option<String>,

    /// Runtime identifier (overrides target.runtime)
    #[arg(short, long)]
    pub runtime: Option<String>,
}

/// Arguments for the restore command
#[derive(Parser, Debug)]
pub struct RestoreArgs {
    /// Packages to restore, as ID or ID@VERSION
    #[arg(required = true, value_name = "ID[@VERSION]")]
    pub packages: Vec<String>,

    #[command(flatten)]
    pub repositories: RepositoryArgs,

    /// Disk cache root (overrides cache.dir and PKGRESTORE_LOCKFILE_CACHE)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Do not read or write the disk cache
    #[arg(long)]
    pub no_disk_cache: bool,

    /// Write the lock file to this path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the closure command
#[derive(Parser, Debug)]
pub struct ClosureArgs {
    /// Lock file to read
    #[arg(short, long, value_name = "FILE")]
    pub lock_file: PathBuf,

    /// Root packages to walk from
    #[arg(required = true, value_name = "ROOT")]
    pub roots: Vec<String>,

    /// Do not follow edges into this package (repeatable)
    #[arg(long, value_name = "ID")]
    pub exclude: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the assets command
#[derive(Parser, Debug)]
pub struct AssetsArgs {
    /// Lock file to read
    #[arg(short, long, value_name = "FILE")]
    pub lock_file: PathBuf,

    /// Only include the closure of these packages (default: every library)
    #[arg(value_name = "ROOT")]
    pub roots: Vec<String>,

    #[command(flatten)]
    pub repositories: RepositoryArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,

    /// Disk cache root (overrides cache.dir and PKGRESTORE_LOCKFILE_CACHE)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Print the disk cache root
    Path,

    /// List cached lock files
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Delete every cached lock file
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., target.runtime)
        key: String,
        /// Value to set
        value: String,
        /// Write to project-local .pkgrestore.toml instead of global config
        #[arg(long)]
        local: bool,
    },
}
