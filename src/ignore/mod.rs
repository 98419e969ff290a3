//! Ignore-rule resolution: locating the project root, compiling ignore-file
//! and submodule-derived rules, and answering ignore/keep decisions with
//! gitignore-style last-match-wins semantics.

mod rules;
mod submodules;

pub use rules::IgnoreRule;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub const IGNORE_FILE: &str = ".gitignore";
pub const SUBMODULE_FILE: &str = ".gitmodules";

/// The ordered rule list for one run, anchored at the project root.
///
/// Constructed once at startup and read-only thereafter. Submodule-derived
/// rules always precede file-derived rules, so an ignore-file line could in
/// principle re-include a path a submodule rule covers.
#[derive(Debug)]
pub struct IgnoreSet {
    root: PathBuf,
    rules: Vec<IgnoreRule>,
    patterns: Vec<String>,
}

impl IgnoreSet {
    /// Resolves the project root and compiles the rule list.
    ///
    /// Walks upward from `start_dir` until an ignore file is found; the
    /// directory holding it becomes the project root. When none exists the
    /// start directory is the root and only submodule-derived rules apply —
    /// that is a degraded-but-valid state, not an error.
    pub fn load(start_dir: &Path) -> IgnoreSet {
        let Some(root) = find_ignore_file(start_dir) else {
            debug!(
                "no {IGNORE_FILE} found above {}, scanning unfiltered",
                start_dir.display()
            );
            let submodule_paths = submodules::declared_paths(start_dir);
            return Self::from_parts(start_dir.to_path_buf(), "", &submodule_paths);
        };

        let text = match fs::read_to_string(root.join(IGNORE_FILE)) {
            Ok(text) => text,
            Err(err) => {
                warn!("cannot read {IGNORE_FILE} in {}: {err}", root.display());
                String::new()
            }
        };
        let submodule_paths = submodules::declared_paths(&root);
        Self::from_parts(root, &text, &submodule_paths)
    }

    /// Builds a set from raw ignore-file text and submodule paths.
    pub fn from_parts(root: PathBuf, ignore_text: &str, submodule_paths: &[String]) -> IgnoreSet {
        let mut rules = Vec::new();
        for path in submodule_paths {
            if let Some(rule) = IgnoreRule::from_submodule(path) {
                rules.push(rule);
            }
        }

        let mut patterns = Vec::new();
        for line in ignore_text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            patterns.push(trimmed.to_string());
            if let Some(rule) = IgnoreRule::from_line(trimmed) {
                rules.push(rule);
            }
        }

        IgnoreSet {
            root,
            rules,
            patterns,
        }
    }

    /// The project root every relative-path decision is anchored to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    /// Evaluates every rule in order; the last matching rule decides. A
    /// path matching no rule is kept.
    pub fn is_ignored(&self, rel_path: &str, is_dir: bool) -> bool {
        let mut ignored = false;
        for rule in &self.rules {
            if rule.matches(rel_path, is_dir) {
                ignored = !rule.negated();
            }
        }
        ignored
    }

    /// Ignore globs for tools with native ignore support.
    ///
    /// Negation lines are dropped, a leading separator is stripped, and a
    /// trailing `/*` collapses to `/` since such tools already recurse on a
    /// bare directory name.
    pub fn native_globs(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|pattern| !pattern.starts_with('!'))
            .map(|pattern| {
                let pattern = pattern.strip_prefix('/').unwrap_or(pattern);
                match pattern.strip_suffix("/*") {
                    Some(dir) => format!("{dir}/"),
                    None => pattern.to_string(),
                }
            })
            .collect()
    }
}

fn find_ignore_file(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir;
    loop {
        if dir.join(IGNORE_FILE).is_file() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}
