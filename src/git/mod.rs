//! Git access for change-set resolution

mod runner;

pub use runner::{check_git_available, run_git, run_git_checked};

use anyhow::Result;
use std::path::Path;

/// Files touched by the most recent commit.
///
/// `-m` splits merge commits into one diff per parent, so a file touched on
/// both sides of a merge appears more than once in the output.
pub fn last_commit_files(repo_root: &Path) -> Result<Vec<String>> {
    let stdout = run_git_checked(
        &["log", "-m", "-1", "--name-only", "--pretty=format:"],
        repo_root,
    )?;

    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}
