//! Lenient semver package version

use crate::error::{RestoreError, RestoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A package version with semver precedence.
///
/// Accepts one to three numeric components; missing components are zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageVersion(semver::Version);

impl PackageVersion {
    /// Create a release version from its numeric components
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parse a version string such as `1`, `1.2`, `1.2.3` or `1.2.3-beta.1`
    pub fn parse(input: &str) -> RestoreResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RestoreError::version_parse(input, "empty version"));
        }

        let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
        let (core, suffix) = trimmed.split_at(split);

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return Err(RestoreError::version_parse(
                input,
                "at most three numeric components are supported",
            ));
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                RestoreError::version_parse(input, format!("'{}' is not a number", part))
            })?;
        }

        let normalized = format!("{}.{}.{}{}", numbers[0], numbers[1], numbers[2], suffix);
        semver::Version::parse(&normalized)
            .map(Self)
            .map_err(|e| RestoreError::version_parse(input, e.to_string()))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Check whether this is a prerelease version
    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PackageVersion {
    type Err = RestoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PackageVersion {
    type Error = RestoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PackageVersion> for String {
    fn from(value: PackageVersion) -> Self {
        value.to_string()
    }
}
