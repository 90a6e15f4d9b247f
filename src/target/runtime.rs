//! Runtime identifier graph
//!
//! Each RID imports less specific RIDs (`win-x64` imports `win`, which
//! imports `any`). Asset selection walks this chain nearest first.

use crate::error::{RestoreError, RestoreResult};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::path::Path;
use tracing::debug;

/// File name of a runtime graph placed at a repository root
pub const RUNTIME_GRAPH_FILE: &str = "runtime.json";

const BUILTIN_RUNTIMES: &[(&str, &[&str])] = &[
    ("any", &[]),
    ("unix", &["any"]),
    ("win", &["any"]),
    ("win-x86", &["win"]),
    ("win-x64", &["win"]),
    ("win-arm64", &["win"]),
    ("linux", &["unix"]),
    ("linux-x64", &["linux"]),
    ("linux-arm64", &["linux"]),
    ("linux-musl", &["linux"]),
    ("linux-musl-x64", &["linux-musl", "linux-x64"]),
    ("linux-musl-arm64", &["linux-musl", "linux-arm64"]),
    ("osx", &["unix"]),
    ("osx-x64", &["osx"]),
    ("osx-arm64", &["osx"]),
];

#[derive(Debug, Deserialize)]
struct RuntimeGraphFile {
    #[serde(default)]
    runtimes: BTreeMap<String, RuntimeDescription>,
}

#[derive(Debug, Deserialize)]
struct RuntimeDescription {
    #[serde(rename = "#import", default)]
    imports: Vec<String>,
}

/// RID compatibility graph
#[derive(Debug, Clone, Default)]
pub struct RuntimeGraph {
    imports: BTreeMap<String, Vec<String>>,
}

impl RuntimeGraph {
    /// Graph covering the common desktop and server RIDs
    pub fn builtin() -> Self {
        let imports = BUILTIN_RUNTIMES
            .iter()
            .map(|(rid, parents)| {
                (
                    (*rid).to_string(),
                    parents.iter().map(|p| (*p).to_string()).collect(),
                )
            })
            .collect();
        Self { imports }
    }

    /// Parse a `runtime.json` document
    pub fn from_json(content: &str) -> RestoreResult<Self> {
        let file: RuntimeGraphFile = serde_json::from_str(content)?;
        let imports = file
            .runtimes
            .into_iter()
            .map(|(rid, desc)| (rid, desc.imports))
            .collect();
        Ok(Self { imports })
    }

    /// Load the first `runtime.json` found under `roots`, falling back to the built-in graph
    pub fn load_from_roots<'a, I>(roots: I) -> RestoreResult<Self>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        for root in roots {
            let path = root.join(RUNTIME_GRAPH_FILE);
            if !path.is_file() {
                continue;
            }
            let content = std::fs::read_to_string(&path)
                .map_err(|e| RestoreError::io(format!("reading {}", path.display()), e))?;
            debug!("Loaded runtime graph from {}", path.display());
            return Self::from_json(&content);
        }
        Ok(Self::builtin())
    }

    /// Check whether the graph knows `rid`
    pub fn contains(&self, rid: &str) -> bool {
        self.imports.contains_key(rid)
    }

    /// `rid` followed by every RID it transitively imports, nearest first
    pub fn expand(&self, rid: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([rid.to_string()]);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(parents) = self.imports.get(&current) {
                queue.extend(parents.iter().cloned());
            }
            order.push(current);
        }

        order
    }
}
