//! File discovery: recursive descent under a scan root with ignore-rule
//! pruning and exact-suffix extension filtering.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::ignore::IgnoreSet;

/// Collects every file under `start` whose name ends with one of
/// `suffixes` and whose project-root-relative path is not ignored.
///
/// An ignored directory is pruned before descent, so nothing beneath it is
/// ever evaluated — even a file a later negation rule would re-include.
/// Unreadable directories contribute zero entries and never fail the walk.
pub fn walk_files(start: &Path, suffixes: &[&str], ignore: &IgnoreSet) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(start).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 {
            return true;
        }
        match relative_to(entry.path(), ignore.root()) {
            Some(rel) => !ignore.is_ignored(&rel, entry.file_type().is_dir()),
            None => true,
        }
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if suffixes.iter().any(|suffix| name.ends_with(suffix)) {
            files.push(entry.into_path());
        }
    }

    files
}

fn relative_to(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
