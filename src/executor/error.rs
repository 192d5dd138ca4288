//! Infrastructure errors from rule execution
//!
//! These are failures to run a script at all. A prover that runs and
//! reports a fatal error is an [`Outcome`](super::Outcome), not an error.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("rule script not found: {}", path.display())]
    ScriptMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("rule script is not an executable file: {}", path.display())]
    NotExecutable { path: PathBuf },

    #[error("failed to spawn `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("rule process was started without a {0} pipe")]
    MissingPipe(&'static str),
}
