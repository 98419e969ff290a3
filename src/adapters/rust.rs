use std::ffi::OsStr;
use std::path::Path;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::info;

use super::{display_name, AdapterError, FormatAdapter, FormatContext};
use crate::discovery::walk_files;
use crate::process::{probe, runner};

const RUST_SUFFIX: &str = ".rs";
const PROJECT_MARKER: &str = "Cargo.toml";
const RUSTFMT_EDITION: &str = "2021";

pub const CARGO_TOOL: &str = "cargo";
pub const RUSTFMT_TOOL: &str = "rustfmt";

const INSTALL_HINT: &str =
    "Install Rust from https://rustup.rs/ and add rustfmt with `rustup component add rustfmt`.";

/// Formats Rust sources.
///
/// Inside a Cargo project (a `Cargo.toml` marker in the working directory)
/// formatting is delegated to one project-aware `cargo fmt` invocation.
/// Outside one, standalone `rustfmt` pinned to a fixed edition is dispatched
/// per discovered file. rustfmt is diff-style: in check mode a non-zero exit
/// from `--check` means the file needs formatting.
pub struct RustAdapter {
    cargo: String,
    rustfmt: String,
}

impl Default for RustAdapter {
    fn default() -> Self {
        Self {
            cargo: CARGO_TOOL.to_string(),
            rustfmt: RUSTFMT_TOOL.to_string(),
        }
    }
}

impl RustAdapter {
    pub fn with_tools(cargo: impl Into<String>, rustfmt: impl Into<String>) -> Self {
        Self {
            cargo: cargo.into(),
            rustfmt: rustfmt.into(),
        }
    }

    async fn format_project(&self, ctx: &FormatContext) -> Result<(), AdapterError> {
        if !probe::is_available(&self.cargo).await {
            return Err(AdapterError::MissingTool {
                tool: self.cargo.clone(),
                hint: INSTALL_HINT.to_string(),
            });
        }

        let args: &[&str] = if ctx.check {
            &["fmt", "--check"]
        } else {
            &["fmt"]
        };
        let out = runner::run(&self.cargo, args, &ctx.start_dir, false).await?;
        if out.success {
            return Ok(());
        }
        if ctx.check {
            Err(AdapterError::NeedsFormatting(
                "cargo fmt --check reported files that need formatting".to_string(),
            ))
        } else {
            Err(AdapterError::CommandFailed {
                tool: self.cargo.clone(),
                detail: "cargo fmt exited with an error".to_string(),
            })
        }
    }

    async fn format_standalone(
        &self,
        ctx: &FormatContext,
        files: &[std::path::PathBuf],
    ) -> Result<(), AdapterError> {
        if !probe::is_available(&self.rustfmt).await {
            return Err(AdapterError::MissingTool {
                tool: self.rustfmt.clone(),
                hint: INSTALL_HINT.to_string(),
            });
        }

        if ctx.check {
            let runs = files
                .iter()
                .map(|file| check_file(&self.rustfmt, file, &ctx.start_dir));
            let results = join_all(runs).await;

            let mut unformatted = Vec::new();
            for (file, result) in files.iter().zip(results) {
                if result? {
                    unformatted.push(display_name(file, &ctx.start_dir));
                }
            }
            if !unformatted.is_empty() {
                return Err(AdapterError::NeedsFormatting(format!(
                    "{} file(s) need formatting: {}",
                    unformatted.len(),
                    unformatted.join(", ")
                )));
            }
            Ok(())
        } else {
            let runs = files
                .iter()
                .map(|file| write_file(&self.rustfmt, file, &ctx.start_dir));
            let results = join_all(runs).await;

            let mut failed = 0usize;
            for result in results {
                if !result?.success {
                    failed += 1;
                }
            }
            if failed > 0 {
                return Err(AdapterError::CommandFailed {
                    tool: self.rustfmt.clone(),
                    detail: format!("{failed} file(s) could not be formatted"),
                });
            }
            Ok(())
        }
    }
}

#[async_trait]
impl FormatAdapter for RustAdapter {
    fn name(&self) -> &'static str {
        "rust"
    }

    async fn format(&self, ctx: &FormatContext) -> Result<(), AdapterError> {
        let files = walk_files(&ctx.start_dir, &[RUST_SUFFIX], &ctx.ignore);
        if files.is_empty() {
            return Ok(());
        }
        info!("rustfmt: {} file(s)", files.len());

        if ctx.start_dir.join(PROJECT_MARKER).is_file() {
            self.format_project(ctx).await
        } else {
            self.format_standalone(ctx, &files).await
        }
    }
}

async fn check_file(tool: &str, file: &Path, cwd: &Path) -> Result<bool, AdapterError> {
    let args = [
        OsStr::new("--edition"),
        OsStr::new(RUSTFMT_EDITION),
        OsStr::new("--check"),
        file.as_os_str(),
    ];
    let out = runner::run(tool, &args, cwd, true).await?;
    // Diff-style signal: non-zero exit from --check.
    Ok(!out.success)
}

async fn write_file(
    tool: &str,
    file: &Path,
    cwd: &Path,
) -> Result<runner::RunOutput, AdapterError> {
    let args = [
        OsStr::new("--edition"),
        OsStr::new(RUSTFMT_EDITION),
        file.as_os_str(),
    ];
    Ok(runner::run(tool, &args, cwd, false).await?)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::ignore::IgnoreSet;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn context(root: &Path, check: bool) -> FormatContext {
        FormatContext {
            start_dir: root.to_path_buf(),
            ignore: IgnoreSet::from_parts(root.to_path_buf(), "", &[]),
            check,
        }
    }

    #[tokio::test]
    async fn test_zero_files_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = RustAdapter::with_tools("/no/such/cargo", "/no/such/rustfmt");
        let ctx = context(temp_dir.path(), true);
        assert!(adapter.format(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_rustfmt_reports_install_guidance() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("lib.rs"), "pub fn f() {}\n").unwrap();

        let adapter = RustAdapter::with_tools("/no/such/cargo", "/no/such/rustfmt");
        let ctx = context(temp_dir.path(), true);

        let err = adapter.format(&ctx).await.unwrap_err();
        assert!(matches!(err, AdapterError::MissingTool { .. }));
        assert!(err.to_string().contains("rustup"));
    }

    #[tokio::test]
    async fn test_project_marker_switches_to_cargo() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(PROJECT_MARKER), "[package]\n").unwrap();
        fs::write(root.join("lib.rs"), "pub fn f() {}\n").unwrap();
        // Record the arguments cargo was invoked with.
        let cargo = write_script(root, "fake-cargo", "echo \"$@\" > cargo-args.txt");

        let adapter = RustAdapter::with_tools(cargo.to_str().unwrap(), "/no/such/rustfmt");
        let ctx = context(root, true);
        adapter.format(&ctx).await.unwrap();

        let recorded = fs::read_to_string(root.join("cargo-args.txt")).unwrap();
        assert!(recorded.contains("fmt"));
        assert!(recorded.contains("--check"));
    }

    #[tokio::test]
    async fn test_cargo_check_failure_is_needs_formatting() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(PROJECT_MARKER), "[package]\n").unwrap();
        fs::write(root.join("lib.rs"), "pub fn f(){}\n").unwrap();
        let cargo = write_script(root, "fake-cargo", "exit 1");

        let adapter = RustAdapter::with_tools(cargo.to_str().unwrap(), "/no/such/rustfmt");
        let ctx = context(root, true);

        let err = adapter.format(&ctx).await.unwrap_err();
        assert!(matches!(err, AdapterError::NeedsFormatting(_)));
    }

    #[tokio::test]
    async fn test_standalone_check_uses_exit_status_per_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let source = "pub fn f(){}\n";
        fs::write(root.join("lib.rs"), source).unwrap();
        // Diff-style behavior: --check exits non-zero.
        let rustfmt = write_script(root, "fake-rustfmt", "exit 1");

        let adapter = RustAdapter::with_tools("/no/such/cargo", rustfmt.to_str().unwrap());
        let ctx = context(root, true);

        let err = adapter.format(&ctx).await.unwrap_err();
        assert!(matches!(err, AdapterError::NeedsFormatting(_)));
        assert!(err.to_string().contains("lib.rs"));
        assert_eq!(fs::read_to_string(root.join("lib.rs")).unwrap(), source);
    }

    #[tokio::test]
    async fn test_standalone_write_mode_passes_edition() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("lib.rs"), "pub fn f() {}\n").unwrap();
        let rustfmt = write_script(root, "fake-rustfmt", "echo \"$@\" > rustfmt-args.txt");

        let adapter = RustAdapter::with_tools("/no/such/cargo", rustfmt.to_str().unwrap());
        let ctx = context(root, false);
        adapter.format(&ctx).await.unwrap();

        let recorded = fs::read_to_string(root.join("rustfmt-args.txt")).unwrap();
        assert!(recorded.contains("--edition 2021"));
        assert!(recorded.contains("lib.rs"));
    }
}
