/// repofmt
///
/// Discovers source files across a project tree, filters them against
/// gitignore and submodule rules, and dispatches each recognized file type
/// to its external formatting tool, running every language formatter
/// concurrently in write or check-only mode.
pub mod adapters;
pub mod cli;
pub mod discovery;
pub mod ignore;
pub mod logging;
pub mod orchestrator;
pub mod process;

pub use adapters::{FormatAdapter, FormatContext};
pub use ignore::IgnoreSet;
pub use orchestrator::FormatOutcome;
