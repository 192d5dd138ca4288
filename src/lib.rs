//! Run Certora prover rule scripts for the contracts a change touches and
//! collect the submitted job ids into a report.

pub mod cancel;
pub mod catalog;
pub mod changeset;
pub mod config;
pub mod executor;
pub mod git;
pub mod present;
pub mod process;
pub mod report;
pub mod rule;
