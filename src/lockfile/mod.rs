//! Resolved dependency closures ("lock files")
//!
//! A lock file is bound to one target framework and optional runtime and
//! lists every resolved library with its declared dependency edges and
//! asset groups. The canonical text form is what both cache tiers store,
//! so parsing and re-serializing must reproduce it byte for byte.

mod assets;
mod model;
mod walk;

pub use assets::{resolve_asset_paths, AssetSelector, RuntimeAssetSelector};
pub use model::{AssetGroup, LockDependency, LockFile, LockLibrary, LockTarget, LOCK_FILE_FORMAT};
pub use walk::{dependency_closure, full_closure};
