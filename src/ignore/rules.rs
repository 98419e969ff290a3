use globset::{GlobBuilder, GlobMatcher};
use tracing::warn;

/// One compiled ignore pattern plus its negation flag.
///
/// Ordering among rules is significant: evaluation is a linear scan where
/// the last matching rule wins, so a rule never needs to know about its
/// neighbors.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    source: String,
    negated: bool,
    dir_only: bool,
    matcher: GlobMatcher,
}

impl IgnoreRule {
    /// Compiles one line of ignore-file text.
    ///
    /// Returns `None` for blank lines, comments, and patterns that fail to
    /// compile. Invalid patterns are logged and dropped so the remaining
    /// rules still load.
    pub fn from_line(line: &str) -> Option<IgnoreRule> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let (negated, pattern) = match trimmed.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let dir_only = pattern.ends_with('/');
        let pattern = pattern.trim_end_matches('/');

        // A leading separator anchors the pattern to the root; a pattern
        // without any separator matches the basename at any depth.
        let glob_text = if let Some(anchored) = pattern.strip_prefix('/') {
            anchored.to_string()
        } else if !pattern.contains('/') {
            format!("**/{pattern}")
        } else {
            pattern.to_string()
        };

        let matcher = match GlobBuilder::new(&glob_text).literal_separator(true).build() {
            Ok(glob) => glob.compile_matcher(),
            Err(err) => {
                warn!("dropping invalid ignore pattern {trimmed:?}: {err}");
                return None;
            }
        };

        Some(IgnoreRule {
            source: trimmed.to_string(),
            negated,
            dir_only,
            matcher,
        })
    }

    /// Builds the always-ignored rule for a declared submodule path. The
    /// path is anchored at the root and covers the whole subtree.
    pub fn from_submodule(path: &str) -> Option<IgnoreRule> {
        let line = format!("/{}/", path.trim_matches('/'));
        let mut rule = Self::from_line(&line)?;
        rule.source = path.to_string();
        Some(rule)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn negated(&self) -> bool {
        self.negated
    }

    /// Whether this rule matches `path`, a project-root-relative path using
    /// forward slashes.
    ///
    /// Directory-only rules (trailing separator in the source pattern) match
    /// the directory itself and every path beneath it, but never a plain
    /// file that happens to share the name.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        if self.matcher.is_match(path) {
            return !self.dir_only || is_dir;
        }
        if self.dir_only {
            // Every proper prefix ending at a separator names a directory on
            // the way to this entry.
            for (idx, ch) in path.char_indices() {
                if ch == '/' && self.matcher.is_match(&path[..idx]) {
                    return true;
                }
            }
        }
        false
    }
}
