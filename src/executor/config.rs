//! Configuration types for rule execution

use std::path::PathBuf;
use std::time::Duration;

/// Default time a rule process gets to exit after SIGTERM before SIGKILL
pub const DEFAULT_TERMINATE_GRACE: Duration = Duration::from_secs(5);

/// How often the reader loop wakes up to check cancellation and timeouts
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for running rule scripts
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Directory the rule ids are resolved against
    pub rule_dir: PathBuf,
    /// Longest wait for the next line of output before giving up on a rule.
    /// `None` waits for as long as the script keeps its stdout open.
    pub read_timeout: Option<Duration>,
    /// Grace period between SIGTERM and SIGKILL when tearing a rule down
    pub terminate_grace: Duration,
}

impl ExecutorConfig {
    pub fn new(rule_dir: impl Into<PathBuf>) -> Self {
        Self {
            rule_dir: rule_dir.into(),
            read_timeout: None,
            terminate_grace: DEFAULT_TERMINATE_GRACE,
        }
    }

    /// Same configuration with a bounded wait for output
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }
}
