//! pkgrestore - cached package restore
//!
//! Resolves the dependency closure of a set of packages against one target
//! framework and runtime, reusing previously resolved lock files from an
//! in-memory cache and an on-disk cache whenever they are still valid.

pub mod cache;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod lockfile;
pub mod repository;
pub mod restore;
pub mod target;
pub mod ui;
pub mod version;

pub use error::{RestoreError, RestoreResult};
pub use restore::{PackageRequest, Resolver, RestoreOutcome};
