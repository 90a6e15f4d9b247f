//! Local package repositories
//!
//! A repository is a directory tree of extracted packages:
//!
//! ```text
//! <root>/<id-lowercase>/<version>/package.toml
//! <root>/<id-lowercase>/<version>/lib/...
//! ```
//!
//! The global packages folder and any fallback folders form the
//! [`RepositorySet`] the staleness checker and asset lookup consult. Feeds
//! use the same layout; packages resolved from a feed are installed into
//! the global packages folder.

mod install;
mod local;
mod set;

pub use install::install_package;
pub use local::{LocalRepository, ManifestDependency, PackageManifest, PackageSource, MANIFEST_FILE};
pub use set::RepositorySet;

#[cfg(test)]
pub(crate) use local::test_support;

/// Whether `id` can name a package folder: ASCII letters, digits, `.`, `_`
/// and `-`, not starting with `.` and never containing `..`
pub fn is_valid_package_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.contains("..")
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
