//! Restore orchestration
//!
//! [`Resolver::restore_if_needed`] normalizes the requested packages, then
//! tries, in order:
//!
//! 1. the memory cache (no floating ranges),
//! 2. the disk cache (a single, non-floating request),
//! 3. the resolution engine, writing the result through both caches.
//!
//! Cache hits are checked for staleness against the repositories before
//! they are returned.

mod request;
mod resolver;
mod stale;

pub use request::{normalize_requests, PackageRequest};
pub use resolver::{Resolver, ResolverBuilder, RestoreOutcome};
pub use stale::is_stale;
