use std::path::Path;

use tokio::process::Command;
use tracing::debug;

#[cfg(windows)]
const LOOKUP_COMMAND: &str = "where";
#[cfg(not(windows))]
const LOOKUP_COMMAND: &str = "which";

/// Whether `tool` resolves on the search path, decided by the exit status
/// of the platform lookup utility.
///
/// A name containing a path separator is treated as an explicit location
/// and checked on the filesystem instead. Failure to spawn the lookup
/// utility itself means "not available", never an error.
pub async fn is_available(tool: &str) -> bool {
    if tool.contains('/') || tool.contains('\\') {
        return Path::new(tool).is_file();
    }

    match Command::new(LOOKUP_COMMAND).arg(tool).output().await {
        Ok(out) => out.status.success(),
        Err(err) => {
            debug!("{LOOKUP_COMMAND} {tool} failed to run: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_common_shell_is_available() {
        assert!(is_available("sh").await);
    }

    #[tokio::test]
    async fn test_nonexistent_tool_is_not_available() {
        assert!(!is_available("definitely-not-a-real-binary-1a2b3c").await);
    }

    #[tokio::test]
    async fn test_explicit_path_checked_on_filesystem() {
        assert!(!is_available("/no/such/dir/tool").await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_explicit_path_to_existing_file() {
        use std::fs;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let tool = temp_dir.path().join("fake-tool");
        fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();

        assert!(is_available(tool.to_str().unwrap()).await);
    }
}
