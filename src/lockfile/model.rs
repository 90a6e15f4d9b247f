//! Lock file data model and canonical text form

use crate::error::{RestoreError, RestoreResult};
use crate::repository::is_valid_package_id;
use crate::target::TargetFramework;
use crate::version::{PackageVersion, VersionRange};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current lock file format revision
pub const LOCK_FILE_FORMAT: u32 = 1;

/// Fully resolved dependency closure for one framework and runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockFile {
    /// Format revision
    pub format: u32,

    /// What the closure was resolved for
    pub target: LockTarget,

    /// Resolved libraries, sorted by name
    #[serde(default)]
    pub libraries: Vec<LockLibrary>,
}

/// Framework and runtime a lock file was resolved against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockTarget {
    pub framework: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
}

/// One resolved package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockLibrary {
    pub name: String,

    pub version: PackageVersion,

    /// Declared dependency edges
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<LockDependency>,

    /// Asset groups, one per runtime (or none for portable assets)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetGroup>,
}

/// Declared dependency of a library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockDependency {
    pub id: String,

    pub range: VersionRange,
}

/// Files a package contributes for one runtime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetGroup {
    /// Runtime identifier, `None` for runtime-independent assets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,

    /// Managed assemblies, relative to the package directory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime: Vec<String>,

    /// Native libraries, relative to the package directory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub native: Vec<String>,
}

impl LockFile {
    /// Create an empty lock file for a target
    pub fn new(framework: &TargetFramework, runtime: Option<&str>) -> Self {
        Self {
            format: LOCK_FILE_FORMAT,
            target: LockTarget {
                framework: framework.to_string(),
                runtime: runtime.map(str::to_string),
            },
            libraries: Vec::new(),
        }
    }

    /// Parse the canonical text form
    pub fn parse(text: &str) -> RestoreResult<Self> {
        let lock: LockFile =
            serde_json::from_str(text).map_err(|e| RestoreError::LockFileParse(e.to_string()))?;

        if lock.format != LOCK_FILE_FORMAT {
            return Err(RestoreError::LockFileParse(format!(
                "unsupported format {} (expected {})",
                lock.format, LOCK_FILE_FORMAT
            )));
        }

        let invalid = lock.libraries.iter().find_map(|lib| {
            std::iter::once(&lib.name)
                .chain(lib.dependencies.iter().map(|dep| &dep.id))
                .find(|id| !is_valid_package_id(id))
        });
        if let Some(id) = invalid {
            return Err(RestoreError::LockFileParse(format!("invalid package id '{}'", id)));
        }

        Ok(lock)
    }

    /// Serialize to the canonical text form
    pub fn to_canonical_string(&self) -> RestoreResult<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    /// Look up a library by name, ignoring case
    pub fn library(&self, name: &str) -> Option<&LockLibrary> {
        let name = name.to_lowercase();
        self.libraries
            .iter()
            .find(|lib| lib.name.to_lowercase() == name)
    }

    /// Index of libraries keyed by lower-cased name
    pub fn libraries_by_name(&self) -> HashMap<String, &LockLibrary> {
        self.libraries
            .iter()
            .map(|lib| (lib.name.to_lowercase(), lib))
            .collect()
    }

    /// Resolved version of a library, if present
    pub fn resolved_version(&self, name: &str) -> Option<&PackageVersion> {
        self.library(name).map(|lib| &lib.version)
    }
}
