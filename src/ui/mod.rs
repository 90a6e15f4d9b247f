//! Terminal output for the CLI
//!
//! Uses `cliclack` (default theme) for spinners and prompts, with plain fallback output in
//! CI and other non-interactive environments. Status output goes to stderr
//! so that stdout only carries command results (lock files, JSON).
//!
//! # Example
//!
//! ```rust,ignore
//! use pkgrestore::ui::{self, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect().with_auto_yes(args.yes);
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Restoring 2 package(s)...");
//! // ... do work ...
//! spinner.stop("Restored 7 libraries");
//!
//! if ui::confirm(&ctx, "Delete 12 cached lock files?", false).await? {
//!     ui::step_ok(&ctx, "Cache cleared");
//! }
//! ```

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{remark, step_error_detail, step_info, step_ok, step_ok_detail, step_warn, step_warn_hint};
pub use progress::TaskSpinner;
pub use prompts::confirm;
