//! Error types for pkgrestore
//!
//! All modules use `RestoreResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pkgrestore operations
pub type RestoreResult<T> = Result<T, RestoreError>;

/// All errors that can occur while restoring packages
#[derive(Error, Debug)]
pub enum RestoreError {
    // Input errors
    #[error("Invalid version '{input}': {reason}")]
    VersionParse { input: String, reason: String },

    #[error("Invalid target framework '{0}'")]
    FrameworkParse(String),

    #[error("Invalid package request '{0}': expected ID or ID@VERSION")]
    RequestParse(String),

    // Resolution errors
    #[error("Package not found: {id} {range}")]
    PackageNotFound { id: String, range: String },

    #[error("Version conflict for {id}: {selected} does not satisfy {range} (required by {required_by})")]
    VersionConflict {
        id: String,
        selected: String,
        range: String,
        required_by: String,
    },

    #[error("Resolution failed: {0}")]
    Resolution(String),

    #[error("Invalid package manifest at {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    #[error("Restore was cancelled")]
    Cancelled,

    // Lock file errors
    #[error("Failed to parse lock file: {0}")]
    LockFileParse(String),

    // Cache errors
    #[error("Failed to read cached lock file {path}")]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cached lock file {path}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl RestoreError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a version parse error
    pub fn version_parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::VersionParse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Check if the error was caused by cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::PackageNotFound { .. } => Some(
                "Check repositories.global_packages, repositories.fallback_folders and repositories.feeds",
            ),
            Self::FrameworkParse(_) => Some("Use a moniker such as netcoreapp3.1 or net8.0"),
            Self::RequestParse(_) => Some("Example: Newtonsoft.Json@13.0.1"),
            Self::LockFileParse(_) => Some("Delete the cached lock file and restore again"),
            _ => None,
        }
    }
}
