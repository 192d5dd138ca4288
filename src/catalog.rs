//! Contract → rule-script catalog
//!
//! The catalog is the static table that says which prover rule scripts
//! verify which contract. It is loaded once (see [`crate::config`]) and
//! passed explicitly to the report builder, never read from global state.
//!
//! Both levels are ordered: contracts keep the order they were declared in,
//! and each contract keeps the declared order of its rules.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One `[[contracts]]` entry in `certora-ci.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Contract identifier, usually the Solidity file basename (e.g. `Proxy.sol`)
    pub name: String,
    /// Rule identifiers, in the order they should run
    #[serde(default)]
    pub rules: Vec<String>,
}

/// Immutable contract → rules table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleCatalog {
    entries: Vec<CatalogEntry>,
}

impl RuleCatalog {
    /// Build a catalog, rejecting duplicate contracts and blank rule ids.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.trim().is_empty() {
                bail!("Catalog contains a contract with an empty name");
            }
            if !seen.insert(entry.name.as_str()) {
                bail!("Contract '{}' is listed more than once", entry.name);
            }
            if entry.rules.iter().any(|r| r.trim().is_empty()) {
                bail!("Contract '{}' has an empty rule id", entry.name);
            }
        }
        Ok(Self { entries })
    }

    /// Rules configured for `contract`, or `None` if it is not in the catalog
    pub fn rules_for(&self, contract: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.name == contract)
            .map(|e| e.rules.as_slice())
    }

    pub fn contains(&self, contract: &str) -> bool {
        self.rules_for(contract).is_some()
    }

    /// All contract ids, in declaration order
    pub fn contracts(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
