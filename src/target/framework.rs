//! Target framework monikers

use crate::error::{RestoreError, RestoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The framework a resolver is bound to, e.g. `netcoreapp3.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetFramework {
    /// Framework family (`netcoreapp`, `net`, `netstandard`)
    pub name: String,
    /// Framework version as written in the moniker (`3.1`)
    pub version: String,
}

impl TargetFramework {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse a short moniker: the family is everything before the first digit
    pub fn parse(moniker: &str) -> RestoreResult<Self> {
        let moniker = moniker.trim();
        let split = moniker
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| RestoreError::FrameworkParse(moniker.to_string()))?;
        let (name, version) = moniker.split_at(split);

        let valid_name = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic());
        let valid_version = version.chars().all(|c| c.is_ascii_digit() || c == '.')
            && !version.ends_with('.');
        if !valid_name || !valid_version {
            return Err(RestoreError::FrameworkParse(moniker.to_string()));
        }

        Ok(Self::new(name.to_lowercase(), version))
    }
}

impl fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.version)
    }
}

impl FromStr for TargetFramework {
    type Err = RestoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
