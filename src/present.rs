//! Report rendering

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::fmt::Write;

use crate::executor::Classification;
use crate::report::{ContractReport, Report, Summary};

/// Output format for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Render `report` in the requested format
pub fn render(report: &Report, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(render_text(report)),
        Format::Json => render_json(report, Utc::now()),
    }
}

/// Human-readable report.
///
/// Per rule: `<contract>(<rule>) job_id:<id>`, then the status and output
/// lines with newlines removed.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "--- Report Output ---".bold());

    for contract in &report.contracts {
        write_contract(&mut out, contract);
        let _ = writeln!(out, "-------\n");
    }

    if report.cancelled {
        let _ = writeln!(out, "{}", "Run interrupted, report is partial".yellow());
    }

    write_summary(&mut out, &report.summary());
    out
}

fn write_contract(out: &mut String, contract: &ContractReport) {
    for rule in &contract.rules {
        let outcome = &rule.outcome;
        let _ = writeln!(
            out,
            "{}({}) job_id:{}",
            contract.contract.bold(),
            rule.rule,
            paint(outcome.classification, &outcome.job_id)
        );
        let _ = writeln!(out, "{}", strip_newlines(&outcome.status_line));
        let _ = writeln!(out, "{}", strip_newlines(&outcome.output_line));
    }
}

fn write_summary(out: &mut String, summary: &Summary) {
    let _ = writeln!(
        out,
        "{} {} accepted, {} fatal, {} exhausted, {} failed to start",
        "Summary:".bold(),
        summary.accepted,
        summary.fatal,
        summary.exhausted,
        summary.spawn_failures
    );
}

fn paint(classification: Classification, text: &str) -> ColoredString {
    match classification {
        Classification::Accepted => text.green(),
        Classification::Fatal | Classification::SpawnFailure => text.red(),
        Classification::Exhausted => text.yellow(),
    }
}

fn strip_newlines(s: &str) -> String {
    s.replace(['\n', '\r'], "")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    summary: Summary,
    #[serde(flatten)]
    report: &'a Report,
}

/// Machine-readable report
pub fn render_json(report: &Report, generated_at: DateTime<Utc>) -> Result<String> {
    let doc = JsonReport {
        generated_at,
        summary: report.summary(),
        report,
    };
    serde_json::to_string_pretty(&doc).context("Failed to serialize report to JSON")
}
