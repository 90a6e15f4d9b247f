//! Restore target: framework moniker and runtime identifier graph

mod framework;
mod runtime;

pub use framework::TargetFramework;
pub use runtime::{RuntimeGraph, RUNTIME_GRAPH_FILE};
