//! Working-tree cleanliness check before files are rewritten in place.

use std::io;
use std::process::Command;

use camino::Utf8Path;
use tracing::{debug, warn};

/// State of the git working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingTree {
    /// `git status --porcelain` printed nothing.
    Clean,
    /// There are uncommitted or untracked changes.
    Dirty,
}

/// Runs `git status --porcelain` in `dir`.
///
/// # Errors
///
/// Returns an error if git cannot be started or exits unsuccessfully
/// (for example outside a repository).
pub fn working_tree(dir: &Utf8Path) -> io::Result<WorkingTree> {
    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(dir)
        .output()?;

    if !output.status.success() {
        return Err(io::Error::other(format!(
            "git status failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    if String::from_utf8_lossy(&output.stdout).trim().is_empty() {
        Ok(WorkingTree::Clean)
    } else {
        Ok(WorkingTree::Dirty)
    }
}

/// Returns `false` only when the tree in `dir` is dirty and `force` is not set.
///
/// When git is unavailable the check passes.
#[must_use]
pub fn check_preconditions(dir: &Utf8Path, force: bool) -> bool {
    match working_tree(dir) {
        Ok(WorkingTree::Dirty) if !force => {
            warn!(dir = %dir, "Git has uncommitted changes, use --force to proceed anyway");
            false
        }
        Ok(WorkingTree::Dirty) => {
            debug!(dir = %dir, "Git has uncommitted changes, proceeding because of --force");
            true
        }
        Ok(WorkingTree::Clean) => true,
        Err(e) => {
            debug!(dir = %dir, error = %e, "Git not available, skipping status check");
            true
        }
    }
}
