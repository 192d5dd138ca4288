//! Result of running one rule script

use serde::Serialize;
use std::fmt;

/// Job id recorded when the script ended without a recognizable marker
pub const NOT_FOUND_JOB_ID: &str = "Not found url";

/// Job id recorded when the script could not be started at all
pub const SPAWN_FAILURE_JOB_ID: &str = "Execution error: rule script could not be started";

/// How a rule run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The prover accepted the job and printed its status URL
    Accepted,
    /// The prover printed a fatal error
    Fatal,
    /// Output ended (or the wait was cut short) before either marker
    Exhausted,
    /// The script could not be started
    SpawnFailure,
}

impl Classification {
    /// Whether this result needs a human to look at it
    pub fn is_failure(self) -> bool {
        !matches!(self, Classification::Accepted)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Accepted => write!(f, "accepted"),
            Classification::Fatal => write!(f, "fatal"),
            Classification::Exhausted => write!(f, "exhausted"),
            Classification::SpawnFailure => write!(f, "spawn-failure"),
        }
    }
}

/// Terminal result of one rule execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub classification: Classification,
    /// Prover job id, the fatal error line, or a sentinel
    pub job_id: String,
    /// Status URL line, empty unless accepted
    pub status_line: String,
    /// Job output URL line, empty unless accepted
    pub output_line: String,
}

impl Outcome {
    /// Outcome for a submitted job, derived from the status line.
    ///
    /// The job id is the last path segment of the URL before its query
    /// string; the output line swaps `jobStatus` for `output`.
    pub fn accepted(status_line: &str) -> Self {
        let without_query = status_line.split('?').next().unwrap_or_default();
        let job_id = without_query.rsplit('/').next().unwrap_or_default();

        Self {
            classification: Classification::Accepted,
            job_id: job_id.to_string(),
            status_line: status_line.to_string(),
            output_line: status_line.replace("jobStatus", "output"),
        }
    }

    pub fn fatal(line: &str) -> Self {
        Self {
            classification: Classification::Fatal,
            job_id: line.to_string(),
            status_line: String::new(),
            output_line: String::new(),
        }
    }

    pub fn exhausted() -> Self {
        Self {
            classification: Classification::Exhausted,
            job_id: NOT_FOUND_JOB_ID.to_string(),
            status_line: String::new(),
            output_line: String::new(),
        }
    }

    pub fn spawn_failure() -> Self {
        Self {
            classification: Classification::SpawnFailure,
            job_id: SPAWN_FAILURE_JOB_ID.to_string(),
            status_line: String::new(),
            output_line: String::new(),
        }
    }
}
