//! Ctrl+C handling
//!
//! Interrupting a run stops the rule that is currently being read (it is
//! recorded as exhausted and its process group is terminated) and prevents
//! any further rules from starting. The partial report is still printed.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Route SIGINT/SIGTERM to `flag`.
pub fn install_handler(flag: &CancelFlag) -> Result<()> {
    let flag = flag.clone();
    ctrlc::set_handler(move || {
        warn!("Interrupted, stopping after the current rule");
        flag.cancel();
    })
    .context("Failed to set Ctrl+C handler")
}
