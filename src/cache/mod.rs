//! Two-tier lock file cache
//!
//! | Tier | Key | Used when |
//! |------|-----|-----------|
//! | Memory | sorted request ids, then resolved version tuple | no request floats |
//! | Disk | framework / version / rid / id / resolved version | single non-floating request |
//!
//! Both tiers store the canonical lock file text. Memory entries live as
//! long as the resolver; disk entries live until someone deletes them.

pub mod disk;
pub mod memory;

pub use disk::{resolve_cache_root, DiskCache, DiskCacheEntry, CACHE_DIR_ENV, UNKNOWN_RID};
pub use memory::{MemoryCache, MemoryCacheKey, VersionTuple};
