//! Rule script execution
//!
//! Runs one prover rule script as a child process and turns its streamed
//! stdout into a single [`Outcome`]:
//!
//! - **accepted**: a line carried the job status URL
//! - **fatal**: a line carried the prover's fatal error
//! - **exhausted**: output ended, the read timeout fired, or the run was
//!   cancelled before either marker appeared
//!
//! Scripts that cannot be started surface as [`ExecError`] instead; the
//! report builder turns those into spawn-failure outcomes.
//!
//! # Blocking
//!
//! By default a rule is read for as long as its stdout stays open, so a
//! script that never writes and never exits stalls the run. Setting
//! [`ExecutorConfig::read_timeout`] bounds the wait between output lines.
//! Either way the script's process group is terminated once a
//! classification is reached.

mod classify;
mod config;
mod error;
mod outcome;
mod run;


pub use classify::{State, FATAL_MARKER, STATUS_MARKER};
pub use config::{ExecutorConfig, DEFAULT_TERMINATE_GRACE};
pub use error::ExecError;
pub use outcome::{Classification, Outcome, NOT_FOUND_JOB_ID, SPAWN_FAILURE_JOB_ID};
pub use run::RuleExecutor;
