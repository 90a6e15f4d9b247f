//! Package versions and version ranges
//!
//! Versions are semver-ordered but parsed leniently (`1.0` is `1.0.0`).
//! Ranges use interval notation (`[1.0.0, 2.0.0)`), floating wildcards
//! (`*`, `1.*`, `1.2.*`) or a bare version, which pins exactly.

mod number;
mod range;

pub use number::PackageVersion;
pub use range::{FloatRange, VersionRange};
