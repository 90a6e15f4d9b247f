//! Version range parsing and matching

use super::PackageVersion;
use crate::error::{RestoreError, RestoreResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Wildcard portion of a floating range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatRange {
    /// `*` - any stable version
    Any,
    /// `N.*` - any stable version with major `N`
    Major(u64),
    /// `N.M.*` - any stable version with major `N` and minor `M`
    Minor(u64, u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Bound {
    version: PackageVersion,
    inclusive: bool,
}

/// A constraint on package versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionRange {
    min: Option<Bound>,
    max: Option<Bound>,
    float: Option<FloatRange>,
}

impl VersionRange {
    /// Range matching exactly one version
    pub fn exact(version: PackageVersion) -> Self {
        Self {
            min: Some(Bound {
                version: version.clone(),
                inclusive: true,
            }),
            max: Some(Bound {
                version,
                inclusive: true,
            }),
            float: None,
        }
    }

    /// Range matching `version` and everything above it
    pub fn at_least(version: PackageVersion) -> Self {
        Self {
            min: Some(Bound {
                version,
                inclusive: true,
            }),
            max: None,
            float: None,
        }
    }

    /// Floating, stable, unbounded range (`*`)
    pub fn floating_any() -> Self {
        Self {
            min: None,
            max: None,
            float: Some(FloatRange::Any),
        }
    }

    /// Parse a requested range. A bare version pins exactly.
    pub fn parse(input: &str) -> RestoreResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RestoreError::version_parse(input, "empty version range"));
        }

        if trimmed.starts_with('[') || trimmed.starts_with('(') {
            Self::parse_interval(input, trimmed)
        } else if trimmed.contains('*') {
            Self::parse_floating(input, trimmed)
        } else {
            Ok(Self::exact(PackageVersion::parse(trimmed)?))
        }
    }

    /// Parse a range declared by a package manifest. A bare version is a minimum.
    pub fn parse_dependency(input: &str) -> RestoreResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::floating_any());
        }
        if trimmed.starts_with('[') || trimmed.starts_with('(') || trimmed.contains('*') {
            Self::parse(trimmed)
        } else {
            Ok(Self::at_least(PackageVersion::parse(trimmed)?))
        }
    }

    fn parse_interval(input: &str, trimmed: &str) -> RestoreResult<Self> {
        let min_inclusive = trimmed.starts_with('[');
        let max_inclusive = match trimmed.chars().last() {
            Some(']') => true,
            Some(')') => false,
            _ => {
                return Err(RestoreError::version_parse(
                    input,
                    "interval must end with ']' or ')'",
                ))
            }
        };
        if trimmed.len() < 2 {
            return Err(RestoreError::version_parse(input, "incomplete interval"));
        }
        let inner = &trimmed[1..trimmed.len() - 1];

        let Some((low, high)) = inner.split_once(',') else {
            // `[1.2.3]` pins exactly; `(1.2.3)` matches nothing
            if !(min_inclusive && max_inclusive) {
                return Err(RestoreError::version_parse(
                    input,
                    "single-version interval must be inclusive",
                ));
            }
            return Ok(Self::exact(PackageVersion::parse(inner)?));
        };

        let parse_bound = |s: &str, inclusive: bool| -> RestoreResult<Option<Bound>> {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            Ok(Some(Bound {
                version: PackageVersion::parse(s)?,
                inclusive,
            }))
        };

        let min = parse_bound(low, min_inclusive)?;
        let max = parse_bound(high, max_inclusive)?;

        if let (Some(lo), Some(hi)) = (&min, &max) {
            let empty = match lo.version.cmp(&hi.version) {
                Ordering::Greater => true,
                Ordering::Equal => !(lo.inclusive && hi.inclusive),
                Ordering::Less => false,
            };
            if empty {
                return Err(RestoreError::version_parse(input, "range matches no version"));
            }
        }

        Ok(Self {
            min,
            max,
            float: None,
        })
    }

    fn parse_floating(input: &str, trimmed: &str) -> RestoreResult<Self> {
        if trimmed == "*" {
            return Ok(Self::floating_any());
        }

        let prefix = trimmed.strip_suffix(".*").ok_or_else(|| {
            RestoreError::version_parse(input, "wildcard must be the last component")
        })?;
        let numbers: Vec<u64> = prefix
            .split('.')
            .map(|p| p.parse::<u64>())
            .collect::<Result<_, _>>()
            .map_err(|_| RestoreError::version_parse(input, "invalid floating prefix"))?;

        let (float, min) = match numbers.as_slice() {
            [major] => (FloatRange::Major(*major), PackageVersion::new(*major, 0, 0)),
            [major, minor] => (
                FloatRange::Minor(*major, *minor),
                PackageVersion::new(*major, *minor, 0),
            ),
            _ => {
                return Err(RestoreError::version_parse(
                    input,
                    "wildcard must follow one or two numeric components",
                ))
            }
        };

        Ok(Self {
            min: Some(Bound {
                version: min,
                inclusive: true,
            }),
            max: None,
            float: Some(float),
        })
    }

    /// Check whether the range floats to the newest match
    pub fn is_floating(&self) -> bool {
        self.float.is_some()
    }

    /// The pinned version, if the range matches exactly one version
    pub fn exact_version(&self) -> Option<&PackageVersion> {
        match (&self.min, &self.max, self.float) {
            (Some(lo), Some(hi), None) if lo.inclusive && hi.inclusive && lo.version == hi.version => {
                Some(&lo.version)
            }
            _ => None,
        }
    }

    /// Check whether `version` falls inside the range
    pub fn satisfies(&self, version: &PackageVersion) -> bool {
        if version.is_prerelease() && !self.allows_prerelease() {
            return false;
        }

        if let Some(lo) = &self.min {
            match version.cmp(&lo.version) {
                Ordering::Less => return false,
                Ordering::Equal if !lo.inclusive => return false,
                _ => {}
            }
        }

        if let Some(hi) = &self.max {
            match version.cmp(&hi.version) {
                Ordering::Greater => return false,
                Ordering::Equal if !hi.inclusive => return false,
                _ => {}
            }
        }

        match self.float {
            None | Some(FloatRange::Any) => true,
            Some(FloatRange::Major(major)) => version.major() == major,
            Some(FloatRange::Minor(major, minor)) => {
                version.major() == major && version.minor() == minor
            }
        }
    }

    fn allows_prerelease(&self) -> bool {
        if self.float.is_some() {
            return false;
        }
        [&self.min, &self.max]
            .into_iter()
            .flatten()
            .any(|b| b.version.is_prerelease())
    }

    /// Pick the preferred version: newest for floating ranges, lowest applicable otherwise
    pub fn find_best_match<'a, I>(&self, versions: I) -> Option<&'a PackageVersion>
    where
        I: IntoIterator<Item = &'a PackageVersion>,
    {
        let candidates = versions.into_iter().filter(|v| self.satisfies(v));
        if self.is_floating() {
            candidates.max()
        } else {
            candidates.min()
        }
    }

    /// Pick the highest version inside the range
    pub fn find_highest_match<'a, I>(&self, versions: I) -> Option<&'a PackageVersion>
    where
        I: IntoIterator<Item = &'a PackageVersion>,
    {
        versions.into_iter().filter(|v| self.satisfies(v)).max()
    }

    /// Order ranges by lower bound; an unbounded lower end sorts lowest.
    pub fn cmp_lower_bound(&self, other: &Self) -> Ordering {
        match (&self.min, &other.min) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a
                .version
                .cmp(&b.version)
                // an exclusive lower bound starts just above its version
                .then_with(|| b.inclusive.cmp(&a.inclusive)),
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.float {
            Some(FloatRange::Any) => return write!(f, "*"),
            Some(FloatRange::Major(major)) => return write!(f, "{}.*", major),
            Some(FloatRange::Minor(major, minor)) => return write!(f, "{}.{}.*", major, minor),
            None => {}
        }

        if let Some(version) = self.exact_version() {
            return write!(f, "[{}]", version);
        }

        let open = match &self.min {
            Some(b) if b.inclusive => "[",
            _ => "(",
        };
        let close = match &self.max {
            Some(b) if b.inclusive => "]",
            _ => ")",
        };
        let min = self.min.as_ref().map(|b| b.version.to_string()).unwrap_or_default();
        let max = self.max.as_ref().map(|b| b.version.to_string()).unwrap_or_default();

        write!(f, "{}{}, {}{}", open, min, max, close)
    }
}

impl FromStr for VersionRange {
    type Err = RestoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionRange {
    type Error = RestoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VersionRange> for String {
    fn from(value: VersionRange) -> Self {
        value.to_string()
    }
}
