use async_trait::async_trait;
use tracing::info;

use super::{AdapterError, FormatAdapter, FormatContext};
use crate::discovery::walk_files;
use crate::process::{probe, runner};

const SUFFIXES: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".json", ".md"];

pub const DENO_TOOL: &str = "deno";

const INSTALL_HINT: &str = "Install Deno from https://deno.land/#installation.";

/// Formats web sources (TypeScript, JavaScript, JSON, Markdown) with
/// `deno fmt`.
///
/// deno has native ignore support, so the whole tree is handled by a single
/// invocation carrying an `--ignore=` argument derived from the ignore-file
/// patterns; discovery is only used to decide whether there is anything to
/// do at all.
pub struct DenoAdapter {
    tool: String,
}

impl Default for DenoAdapter {
    fn default() -> Self {
        Self {
            tool: DENO_TOOL.to_string(),
        }
    }
}

impl DenoAdapter {
    pub fn with_tool(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }
}

#[async_trait]
impl FormatAdapter for DenoAdapter {
    fn name(&self) -> &'static str {
        "deno"
    }

    async fn format(&self, ctx: &FormatContext) -> Result<(), AdapterError> {
        let files = walk_files(&ctx.start_dir, SUFFIXES, &ctx.ignore);
        if files.is_empty() {
            return Ok(());
        }

        if !probe::is_available(&self.tool).await {
            return Err(AdapterError::MissingTool {
                tool: self.tool.clone(),
                hint: INSTALL_HINT.to_string(),
            });
        }
        info!("deno fmt: {} candidate file(s)", files.len());

        let mut args = vec!["fmt".to_string()];
        if ctx.check {
            args.push("--check".to_string());
        }
        let globs = ctx.ignore.native_globs();
        if !globs.is_empty() {
            args.push(format!("--ignore={}", globs.join(",")));
        }

        let out = runner::run(&self.tool, &args, &ctx.start_dir, false).await?;
        if out.success {
            return Ok(());
        }
        if ctx.check {
            Err(AdapterError::NeedsFormatting(
                "deno fmt --check reported files that need formatting".to_string(),
            ))
        } else {
            Err(AdapterError::CommandFailed {
                tool: self.tool.clone(),
                detail: "deno fmt exited with an error".to_string(),
            })
        }
    }
}
