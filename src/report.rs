//! Report aggregation
//!
//! Runs every configured rule for every requested contract and collects the
//! outcomes. Contracts appear in the order they were requested and rules in
//! the order the catalog declares them, so two runs over the same input
//! produce reports with the same shape.

use serde::Serialize;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::catalog::RuleCatalog;
use crate::executor::{Classification, ExecError, Outcome, RuleExecutor};

/// Something that can run a single rule.
///
/// [`RuleExecutor`] is the real implementation; tests substitute fakes.
pub trait RuleRunner {
    fn run_rule(&self, rule: &str) -> Result<Outcome, ExecError>;

    /// Stop starting new rules once this returns true
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl RuleRunner for RuleExecutor {
    fn run_rule(&self, rule: &str) -> Result<Outcome, ExecError> {
        self.execute(rule)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag().is_cancelled()
    }
}

/// Outcome of one rule for one contract
#[derive(Debug, Clone, Serialize)]
pub struct RuleReport {
    pub rule: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

/// All rule outcomes for one contract, in catalog order
#[derive(Debug, Clone, Serialize)]
pub struct ContractReport {
    pub contract: String,
    pub rules: Vec<RuleReport>,
}

impl ContractReport {
    pub fn outcome(&self, rule: &str) -> Option<&Outcome> {
        self.rules
            .iter()
            .find(|r| r.rule == rule)
            .map(|r| &r.outcome)
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.rule.as_str())
    }
}

/// Counts per classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub accepted: usize,
    pub fatal: usize,
    pub exhausted: usize,
    pub spawn_failures: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.accepted + self.fatal + self.exhausted + self.spawn_failures
    }

    pub fn failures(&self) -> usize {
        self.total() - self.accepted
    }
}

/// Contract → rule → outcome, in processing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub contracts: Vec<ContractReport>,
    /// Set when the run was interrupted before every rule ran
    pub cancelled: bool,
}

impl Report {
    pub fn contract(&self, contract: &str) -> Option<&ContractReport> {
        self.contracts.iter().find(|c| c.contract == contract)
    }

    pub fn outcome(&self, contract: &str, rule: &str) -> Option<&Outcome> {
        self.contract(contract)?.outcome(rule)
    }

    pub fn contract_ids(&self) -> impl Iterator<Item = &str> {
        self.contracts.iter().map(|c| c.contract.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for rule in self.contracts.iter().flat_map(|c| &c.rules) {
            match rule.outcome.classification {
                Classification::Accepted => summary.accepted += 1,
                Classification::Fatal => summary.fatal += 1,
                Classification::Exhausted => summary.exhausted += 1,
                Classification::SpawnFailure => summary.spawn_failures += 1,
            }
        }
        summary
    }

    /// Whether any rule ended in something other than an accepted job
    pub fn has_failures(&self) -> bool {
        self.contracts
            .iter()
            .flat_map(|c| &c.rules)
            .any(|r| r.outcome.classification.is_failure())
    }
}

/// Run the catalog's rules for `contracts` and collect the outcomes.
///
/// Contracts missing from the catalog are skipped with a warning. A rule
/// that cannot be started is recorded as a spawn failure and does not stop
/// the remaining rules. Repeated contract ids are only run once.
pub fn build_report<R>(contracts: &[String], catalog: &RuleCatalog, runner: &R) -> Report
where
    R: RuleRunner + ?Sized,
{
    let mut report = Report::default();
    let mut seen = HashSet::new();

    'contracts: for contract in contracts {
        if runner.is_cancelled() {
            report.cancelled = true;
            break;
        }

        let Some(rules) = catalog.rules_for(contract) else {
            warn!(contract = %contract, "No rules configured for contract, skipping");
            continue;
        };

        if !seen.insert(contract.as_str()) {
            debug!(contract = %contract, "Contract already checked");
            continue;
        }

        let mut entry = ContractReport {
            contract: contract.clone(),
            rules: Vec::with_capacity(rules.len()),
        };

        for rule in rules {
            if runner.is_cancelled() {
                report.cancelled = true;
                if !entry.rules.is_empty() {
                    report.contracts.push(entry);
                }
                break 'contracts;
            }

            let start = Instant::now();
            let outcome = match runner.run_rule(rule) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(contract = %contract, rule = %rule, error = %e, "Failed to run rule");
                    Outcome::spawn_failure()
                }
            };
            let duration = start.elapsed();

            info!(
                contract = %contract,
                rule = %rule,
                classification = %outcome.classification,
                job_id = %outcome.job_id,
                "Rule finished"
            );

            entry.rules.push(RuleReport {
                rule: rule.clone(),
                outcome,
                duration,
            });
        }

        report.contracts.push(entry);
    }

    report
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
