use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

use super::SUBMODULE_FILE;

/// Reads the submodule declaration file at `root` and returns every
/// `path = <value>` entry in source order.
///
/// An absent or unreadable file means "no submodules"; that is never an
/// error.
pub fn declared_paths(root: &Path) -> Vec<String> {
    let file = root.join(SUBMODULE_FILE);
    let text = match fs::read_to_string(&file) {
        Ok(text) => text,
        Err(err) => {
            if err.kind() != ErrorKind::NotFound {
                warn!("cannot read {}: {err}", file.display());
            }
            return Vec::new();
        }
    };

    text.lines().filter_map(parse_path_entry).collect()
}

fn parse_path_entry(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix("path")?;
    let value = rest.trim_start().strip_prefix('=')?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}
