//! Language adapters: each one composes file discovery, tool probing, and
//! subprocess dispatch into a per-language format-or-check operation.
//!
//! Every adapter follows the same sequence: discover files for its
//! extensions, probe for an available tool, dispatch the tool in check or
//! write mode, and aggregate the results into one success/failure outcome.

pub mod deno;
pub mod go;
pub mod rust;

pub use deno::DenoAdapter;
pub use go::GoAdapter;
pub use rust::RustAdapter;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::ignore::IgnoreSet;

/// Everything an adapter needs for one run, threaded explicitly instead of
/// read from ambient process state.
#[derive(Debug)]
pub struct FormatContext {
    /// Directory the scan starts in; also the working directory every tool
    /// is invoked with.
    pub start_dir: PathBuf,
    /// Compiled ignore rules, anchored at the project root (which may be an
    /// ancestor of `start_dir`).
    pub ignore: IgnoreSet,
    /// Verify only, mutate nothing.
    pub check: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("{tool} is not installed. {hint}")]
    MissingTool { tool: String, hint: String },

    #[error("{0}")]
    NeedsFormatting(String),

    #[error("{tool} failed: {detail}")]
    CommandFailed { tool: String, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait FormatAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn format(&self, ctx: &FormatContext) -> Result<(), AdapterError>;
}

/// The full adapter roster in its fixed declared order. Failure reporting
/// follows this order, not completion order.
pub fn default_adapters() -> Vec<Box<dyn FormatAdapter>> {
    vec![
        Box::new(GoAdapter::default()),
        Box::new(RustAdapter::default()),
        Box::new(DenoAdapter::default()),
    ]
}

pub(crate) fn display_name(file: &Path, start_dir: &Path) -> String {
    file.strip_prefix(start_dir)
        .unwrap_or(file)
        .display()
        .to_string()
}
