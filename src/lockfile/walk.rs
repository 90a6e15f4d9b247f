//! Transitive dependency walk over a lock file

use super::{LockDependency, LockFile, LockLibrary};
use std::collections::HashSet;

/// Collect every library reachable from `roots`.
///
/// Walks depth first, roots in the order given. Dependency ids that are not
/// in the lock file are skipped, and `follow` may reject an edge before it is
/// traversed. Each library appears once, even in cyclic graphs.
pub fn dependency_closure<'a, I, S, F>(lock: &'a LockFile, roots: I, follow: F) -> Vec<&'a LockLibrary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(&LockLibrary, &LockDependency) -> bool,
{
    let index = lock.libraries_by_name();
    let mut visited: HashSet<String> = HashSet::new();
    let mut result = Vec::new();

    for root in roots {
        let Some(&root_lib) = index.get(&root.as_ref().to_lowercase()) else {
            continue;
        };

        let mut stack = vec![root_lib];
        while let Some(library) = stack.pop() {
            if !visited.insert(library.name.to_lowercase()) {
                continue;
            }
            result.push(library);

            // reversed so the first declared dependency is walked first
            for dependency in library.dependencies.iter().rev() {
                if !follow(library, dependency) {
                    continue;
                }
                if let Some(&next) = index.get(&dependency.id.to_lowercase()) {
                    if !visited.contains(&next.name.to_lowercase()) {
                        stack.push(next);
                    }
                }
            }
        }
    }

    result
}

/// Closure from `roots` following every edge
pub fn full_closure<'a, I, S>(lock: &'a LockFile, roots: I) -> Vec<&'a LockLibrary>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    dependency_closure(lock, roots, |_, _| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TargetFramework;
    use crate::version::{PackageVersion, VersionRange};

    fn library(name: &str, deps: &[&str]) -> LockLibrary {
        LockLibrary {
            name: name.to_string(),
            version: PackageVersion::new(1, 0, 0),
            dependencies: deps
                .iter()
                .map(|id| LockDependency {
                    id: id.to_string(),
                    range: VersionRange::parse_dependency("1.0.0").unwrap(),
                })
                .collect(),
            assets: vec![],
        }
    }

    fn lock(libraries: Vec<LockLibrary>) -> LockFile {
        let mut lock = LockFile::new(&TargetFramework::new("net", "8.0"), None);
        lock.libraries = libraries;
        lock
    }

    fn names(libs: &[&LockLibrary]) -> Vec<String> {
        libs.iter().map(|l| l.name.clone()).collect()
    }

    #[test]
    fn cycle_terminates() {
        let lock = lock(vec![library("A", &["B"]), library("B", &["A"])]);
        let closure = full_closure(&lock, ["A"]);
        assert_eq!(names(&closure), vec!["A", "B"]);
    }

    #[test]
    fn depth_first_roots_first() {
        let lock = lock(vec![
            library("A", &["B", "C"]),
            library("B", &["D"]),
            library("C", &[]),
            library("D", &[]),
            library("E", &["C"]),
        ]);
        let closure = full_closure(&lock, ["A", "E"]);
        assert_eq!(names(&closure), vec!["A", "B", "D", "C", "E"]);
    }

    #[test]
    fn dangling_references_are_skipped() {
        let lock = lock(vec![library("A", &["Missing"])]);
        let closure = full_closure(&lock, ["a", "Unknown"]);
        assert_eq!(names(&closure), vec!["A"]);
    }

    #[test]
    fn filter_prunes_subtrees() {
        let lock = lock(vec![
            library("App", &["Tool", "Lib"]),
            library("Tool", &["ToolDep"]),
            library("ToolDep", &[]),
            library("Lib", &[]),
        ]);
        let closure = dependency_closure(&lock, ["App"], |_, dep| dep.id != "Tool");
        assert_eq!(names(&closure), vec!["App", "Lib"]);
    }

    #[test]
    fn shared_dependency_listed_once() {
        let lock = lock(vec![
            library("A", &["Common"]),
            library("B", &["Common"]),
            library("Common", &[]),
        ]);
        let closure = full_closure(&lock, ["A", "B"]);
        assert_eq!(names(&closure), vec!["A", "Common", "B"]);
    }
}
