//! Resolution engine seam
//!
//! The resolver builds a [`RestoreSpec`] describing one synthetic project
//! (one framework, one dependency per requested package) and hands it to a
//! [`RestoreEngine`] together with the shared [`RestoreContext`].

mod context;
mod repository_engine;

pub use context::RestoreContext;
pub use repository_engine::RepositoryEngine;

use crate::error::RestoreResult;
use crate::lockfile::LockFile;
use crate::target::TargetFramework;
use crate::version::VersionRange;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Name given to the synthetic project
pub const RESTORE_PROJECT_NAME: &str = "pkgrestore-request";

/// Project descriptor submitted to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreSpec {
    pub name: String,
    pub framework: TargetFramework,
    pub runtime: Option<String>,
    pub dependencies: Vec<SpecDependency>,
    /// Free-form properties a [`SpecCustomizer`] may add
    pub metadata: BTreeMap<String, String>,
}

/// Direct dependency of the synthetic project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDependency {
    pub id: String,
    pub range: VersionRange,
}

/// Hook run on every project descriptor right before it is submitted
pub type SpecCustomizer = Arc<dyn Fn(&mut RestoreSpec) + Send + Sync>;

/// Dependency resolution backend
#[async_trait]
pub trait RestoreEngine: Send + Sync {
    /// Resolve the full closure of the project described by `spec`
    async fn restore(
        &self,
        spec: &RestoreSpec,
        context: &RestoreContext,
        cancel: &CancellationToken,
    ) -> RestoreResult<LockFile>;

    /// Engine name for logs
    fn engine_name(&self) -> &'static str;
}
