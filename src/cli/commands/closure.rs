//! Closure command - walk dependency edges of a lock file

use super::read_lock_file;
use crate::cli::args::{ClosureArgs, OutputFormat};
use crate::error::RestoreResult;
use crate::lockfile::{dependency_closure, LockLibrary};
use crate::ui::{self, UiContext};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Serialize)]
struct LibraryJson<'a> {
    name: &'a str,
    version: String,
}

/// Execute the closure command
pub async fn execute(args: ClosureArgs) -> RestoreResult<()> {
    let ctx = UiContext::detect();
    let lock = read_lock_file(&args.lock_file).await?;

    for root in &args.roots {
        if lock.library(root).is_none() {
            ui::step_warn(&ctx, &format!("{} is not in {}", root, args.lock_file.display()));
        }
    }

    let excluded: HashSet<String> = args.exclude.iter().map(|id| id.to_lowercase()).collect();
    let libraries = dependency_closure(&lock, &args.roots, |_, dependency| {
        !excluded.contains(&dependency.id.to_lowercase())
    });

    print_libraries(&libraries, args.format)
}

fn print_libraries(libraries: &[&LockLibrary], format: OutputFormat) -> RestoreResult<()> {
    match format {
        OutputFormat::Json => {
            let json: Vec<LibraryJson> = libraries
                .iter()
                .map(|lib| LibraryJson {
                    name: &lib.name,
                    version: lib.version.to_string(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            for library in libraries {
                println!("{} {}", library.name, library.version);
            }
        }
    }
    Ok(())
}
