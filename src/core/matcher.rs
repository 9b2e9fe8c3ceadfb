//! Include/exclude path matching for the monitored set.

use std::path::{Path, PathBuf};

/// Decides whether a concrete file path falls under the monitored set.
///
/// Exclude rules are checked first; any hit wins. Matching is a raw
/// string-prefix test on absolute paths, not separator-boundary aware:
/// an include of `/var/log` also matches `/var/log2/x`. That looseness is
/// long-standing behavior and is kept for compatibility (pinned by test).
#[derive(Debug, Clone)]
pub struct PathMatcher {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl PathMatcher {
    /// Build a matcher from include/exclude prefix lists. Entries are
    /// absolutized against the current directory; symlinks are not
    /// resolved.
    pub fn new(include: &[PathBuf], exclude: &[PathBuf]) -> Self {
        PathMatcher {
            include: include.iter().map(|p| prefix_string(p)).collect(),
            exclude: exclude.iter().map(|p| prefix_string(p)).collect(),
        }
    }

    /// True when `path` is inside the monitored set.
    pub fn is_monitored(&self, path: &Path) -> bool {
        let candidate = absolutize(path);
        let candidate = candidate.to_string_lossy();
        if self.exclude.iter().any(|p| candidate.starts_with(p.as_str())) {
            return false;
        }
        self.include.iter().any(|p| candidate.starts_with(p.as_str()))
    }
}

fn prefix_string(path: &Path) -> String {
    absolutize(path).to_string_lossy().into_owned()
}

/// Make a path absolute without touching the filesystem: relative paths
/// are joined onto the current directory, symlinks stay unresolved.
pub(crate) fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
