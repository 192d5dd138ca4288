//! Output classification state machine
//!
//! ```text
//!            status marker
//!   Reading ───────────────► Accepted
//!      │  \   fatal marker
//!      │   ─────────────────► Fatal
//!      │ end of output / timeout / cancel
//!      └────────────────────► Exhausted
//! ```
//!
//! Transitions only leave `Reading`; every terminal state absorbs further
//! input unchanged, so a run produces exactly one classification.

use super::outcome::Outcome;

/// Printed by the prover client once the job has been submitted
pub const STATUS_MARKER: &str = "You can follow up on the status: ";

/// Printed by the prover client when it gives up
pub const FATAL_MARKER: &str = "Fatal error";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Reading,
    /// Holds the status line with the marker stripped
    Accepted(String),
    /// Holds the full fatal error line
    Fatal(String),
    Exhausted,
}

impl State {
    /// Advance on one line of output (without its line terminator).
    pub fn on_line(self, line: &str) -> Self {
        if !matches!(self, State::Reading) {
            return self;
        }

        if let Some((_, rest)) = line.split_once(STATUS_MARKER) {
            State::Accepted(rest.trim_end().to_string())
        } else if line.contains(FATAL_MARKER) {
            State::Fatal(line.to_string())
        } else {
            State::Reading
        }
    }

    /// No more output will be read.
    pub fn on_end(self) -> Self {
        match self {
            State::Reading => State::Exhausted,
            terminal => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, State::Reading)
    }

    /// The outcome for a terminal state, `None` while still reading
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            State::Reading => None,
            State::Accepted(status_line) => Some(Outcome::accepted(status_line)),
            State::Fatal(line) => Some(Outcome::fatal(line)),
            State::Exhausted => Some(Outcome::exhausted()),
        }
    }
}
