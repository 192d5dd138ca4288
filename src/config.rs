//! `certora-ci.toml` loading
//!
//! ```toml
//! rule_dir = "./specs/scripts"
//! read_timeout_secs = 3600      # optional, unbounded when absent
//! terminate_grace_secs = 5
//!
//! [[contracts]]
//! name = "Proxy.sol"
//! rules = ["privProxy.sh", "proxy.sh proxy"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{CatalogEntry, RuleCatalog};
use crate::executor::{ExecutorConfig, DEFAULT_TERMINATE_GRACE};

/// Default config file name, looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "certora-ci.toml";

/// Default location of the rule scripts, relative to the repository root
pub const DEFAULT_RULE_DIR: &str = "./specs/scripts";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    rule_dir: Option<PathBuf>,
    #[serde(default)]
    read_timeout_secs: Option<u64>,
    #[serde(default)]
    terminate_grace_secs: Option<u64>,
    #[serde(default)]
    contracts: Vec<CatalogEntry>,
}

/// Fully loaded run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub executor: ExecutorConfig,
    pub catalog: RuleCatalog,
}

impl Config {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content).context("Failed to parse config TOML")?;

        let catalog = RuleCatalog::new(raw.contracts)?;

        let executor = ExecutorConfig {
            rule_dir: raw
                .rule_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RULE_DIR)),
            read_timeout: raw.read_timeout_secs.map(Duration::from_secs),
            terminate_grace: raw
                .terminate_grace_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TERMINATE_GRACE),
        };

        Ok(Self { executor, catalog })
    }
}
