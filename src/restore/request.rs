//! Package requests and their normalization

use crate::error::{RestoreError, RestoreResult};
use crate::repository::is_valid_package_id;
use crate::version::VersionRange;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// One requested package: an id and a version expression.
///
/// An empty `version` asks for the newest stable release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub id: String,
    pub version: String,
}

impl PackageRequest {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }

    /// Parse `ID` or `ID@VERSION`
    pub fn parse(input: &str) -> RestoreResult<Self> {
        let input = input.trim();
        let (id, version) = match input.split_once('@') {
            Some((id, version)) => (id.trim(), version.trim()),
            None => (input, ""),
        };

        if !is_valid_package_id(id) {
            return Err(RestoreError::RequestParse(input.to_string()));
        }
        Ok(Self::new(id, version))
    }
}

impl fmt::Display for PackageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}@{}", self.id, self.version)
        }
    }
}

/// Merge requests into one range per id.
///
/// Entries with an empty id are dropped; any other id that cannot name a
/// package folder is rejected. Ids compare case-sensitively. A
/// group containing an unversioned entry floats over every stable version;
/// otherwise the range with the highest lower bound wins.
pub fn normalize_requests(requests: &[PackageRequest]) -> RestoreResult<BTreeMap<String, VersionRange>> {
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for request in requests.iter().filter(|r| !r.id.trim().is_empty()) {
        if !is_valid_package_id(&request.id) {
            return Err(RestoreError::RequestParse(request.to_string()));
        }
        groups
            .entry(request.id.as_str())
            .or_default()
            .push(request.version.trim());
    }

    let mut normalized = BTreeMap::new();
    for (id, versions) in groups {
        let range = if versions.iter().any(|v| v.is_empty()) {
            VersionRange::floating_any()
        } else {
            let mut best: Option<VersionRange> = None;
            for version in versions {
                let range = VersionRange::parse(version)?;
                best = match best {
                    Some(current) if current.cmp_lower_bound(&range) != Ordering::Less => Some(current),
                    _ => Some(range),
                };
            }
            match best {
                Some(range) => range,
                None => continue,
            }
        };
        normalized.insert(id.to_string(), range);
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::PackageVersion;

    fn requests(pairs: &[(&str, &str)]) -> Vec<PackageRequest> {
        pairs.iter().map(|(id, v)| PackageRequest::new(*id, *v)).collect()
    }

    #[test]
    fn unversioned_entry_floats() {
        let normalized = normalize_requests(&requests(&[("X", "1.0.0"), ("X", "")])).unwrap();
        assert_eq!(normalized.len(), 1);
        assert!(normalized["X"].is_floating());
        assert_eq!(normalized["X"], VersionRange::floating_any());
    }

    #[test]
    fn highest_lower_bound_wins() {
        let normalized = normalize_requests(&requests(&[("X", "1.0.0"), ("X", "2.0.0")])).unwrap();
        assert_eq!(
            normalized["X"].exact_version(),
            Some(&PackageVersion::new(2, 0, 0))
        );
    }

    #[test]
    fn ids_are_case_sensitive_and_empty_ids_dropped() {
        let normalized =
            normalize_requests(&requests(&[("Foo", "1.0"), ("foo", "2.0"), ("", "3.0"), ("  ", "")]))
                .unwrap();
        let keys: Vec<&str> = normalized.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Foo", "foo"]);
    }

    #[test]
    fn ranges_compare_by_lower_bound() {
        let normalized =
            normalize_requests(&requests(&[("X", "[1.5, 2.0)"), ("X", "[1.0, 3.0)")])).unwrap();
        assert_eq!(normalized["X"].to_string(), "[1.5.0, 2.0.0)");
    }

    #[test]
    fn invalid_version_propagates() {
        let result = normalize_requests(&requests(&[("X", "not-a-version")]));
        assert!(matches!(result, Err(RestoreError::VersionParse { .. })));
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(normalize_requests(&[]).unwrap().is_empty());
    }

    #[test]
    fn parse_request() {
        assert_eq!(
            PackageRequest::parse("Newtonsoft.Json@13.0.1").unwrap(),
            PackageRequest::new("Newtonsoft.Json", "13.0.1")
        );
        assert_eq!(PackageRequest::parse("Foo").unwrap(), PackageRequest::new("Foo", ""));
        assert_eq!(PackageRequest::parse("Foo@").unwrap().to_string(), "Foo");
        assert!(matches!(
            PackageRequest::parse("@1.0"),
            Err(RestoreError::RequestParse(_))
        ));
    }

    #[test]
    fn path_like_ids_rejected() {
        for input in ["../../../../../escaped@1.0.0", "a/b@1.0.0", ".cache", "Foo Bar@1.0"] {
            assert!(
                matches!(PackageRequest::parse(input), Err(RestoreError::RequestParse(_))),
                "{} should be rejected",
                input
            );
        }

        let result = normalize_requests(&requests(&[("Foo", "1.0.0"), ("../escaped", "1.0.0")]));
        assert!(matches!(result, Err(RestoreError::RequestParse(_))));
    }
}
