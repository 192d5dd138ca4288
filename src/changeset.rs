//! Change-set resolution
//!
//! Decides which contracts a run should check: either the Solidity files
//! touched by the latest commit, or everything in the catalog.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::catalog::RuleCatalog;
use crate::git;

/// Directory prefix that marks a changed file as a contract source
const CONTRACTS_PREFIX: &str = "contracts";

/// Extension of contract source files
const CONTRACT_EXTENSION: &str = ".sol";

/// Which contracts to check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Range {
    /// Contracts touched by the most recent (merge) commit
    #[default]
    Diff,
    /// Every contract in the catalog
    All,
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::Diff => write!(f, "diff"),
            Range::All => write!(f, "all"),
        }
    }
}

/// Resolve the ordered list of contract ids to check.
///
/// The result may contain contracts that are not in the catalog; the report
/// builder skips those.
pub fn resolve(range: Range, catalog: &RuleCatalog, repo_root: &Path) -> Result<Vec<String>> {
    let contracts = match range {
        Range::All => catalog.contracts().map(str::to_string).collect(),
        Range::Diff => {
            git::check_git_available()?;
            let files = git::last_commit_files(repo_root)
                .context("Failed to list files changed by the last commit")?;
            debug!(files = files.len(), "Files in last commit");
            let changed = contracts_from_paths(&files);
            info!(?changed, "Changed contracts");
            changed
        }
    };

    info!(%range, ?contracts, "Checked contracts");
    Ok(contracts)
}

/// Map repository paths to contract ids.
///
/// Keeps `contracts*/**/*.sol` paths, reduces each to its basename and drops
/// repeats while keeping first-seen order.
pub fn contracts_from_paths<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| p.starts_with(CONTRACTS_PREFIX) && p.ends_with(CONTRACT_EXTENSION))
        .filter_map(|p| p.rsplit('/').next())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}
