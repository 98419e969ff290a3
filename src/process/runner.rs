use std::ffi::OsStr;
use std::io;
use std::path::Path;

use tokio::process::Command;
use tracing::debug;

/// Result of one tool invocation. `output` is only populated in silent
/// mode; success is exit status zero in both modes.
#[derive(Debug)]
pub struct RunOutput {
    pub success: bool,
    pub output: String,
}

/// Runs `program` with `args` in `cwd`.
///
/// Silent mode captures stdout and stderr, concatenated into one blob that
/// is returned regardless of exit status — some tools only signal "needs
/// formatting" through non-empty output, not their exit code. Non-silent
/// mode lets the child inherit the parent's streams so tool diagnostics and
/// progress reach the user directly.
pub async fn run<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    cwd: &Path,
    silent: bool,
) -> io::Result<RunOutput> {
    debug!("running {program} ({} args) in {}", args.len(), cwd.display());

    let mut command = Command::new(program);
    command.args(args).current_dir(cwd);

    if silent {
        let out = command.output().await?;
        let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&out.stderr));
        Ok(RunOutput {
            success: out.status.success(),
            output: text,
        })
    } else {
        let status = command.status().await?;
        Ok(RunOutput {
            success: status.success(),
            output: String::new(),
        })
    }
}
