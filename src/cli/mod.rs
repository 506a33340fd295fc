//! # CLI Module
//!
//! User-facing commands of posterpick. Each command resolves what it needs
//! from [`crate::config::Settings`], delegates to the library modules and
//! takes care of console output: progress bars, tables and the coloured
//! status macros.
//!
//! ## Commands
//!
//! - [`fetch`] - Loads the IMDB codes, downloads every poster and optionally
//!   starts the review right after
//! - [`review`] - Reviews the posters already in the output directory
//! - [`report`] - Shows the summary of the last fetch run
//!
//! ## Error Handling
//!
//! Problems that make the whole run pointless (missing codes file, output
//! directory that cannot be created) end the process through `error!` with
//! exit code 1. Everything scoped to a single poster is reported with
//! `warning!` and the run goes on, so a run with failed downloads still
//! exits with 0.
//!
//! ## Usage Patterns
//!
//! ```bash
//! posterpick                         # fetch, then ask whether to review
//! posterpick --no-curate             # fetch only
//! posterpick --codes list.txt --out covers --candidates 3 --curate
//! posterpick review                  # review what is on disk
//! posterpick report                  # show last run
//! ```

mod fetch;
mod report;
mod review;

pub use fetch::fetch;
pub use report::report;
pub use review::review;
