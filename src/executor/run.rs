//! Spawning a rule script and classifying its output stream

use std::collections::VecDeque;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::os::unix::fs::PermissionsExt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::classify::State;
use super::config::{ExecutorConfig, POLL_INTERVAL};
use super::error::ExecError;
use super::outcome::Outcome;
use crate::cancel::CancelFlag;
use crate::process::{shell_command, ProcessGuard};
use crate::rule;

/// How long to wait for the stderr drain after the process is gone
const STDERR_COLLECTION_TIMEOUT: Duration = Duration::from_secs(1);

/// Number of trailing stderr lines kept for diagnostics
const STDERR_TAIL_LINES: usize = 20;

/// What the reader loop saw next
enum Next {
    Line(String),
    Closed,
    TimedOut,
    Cancelled,
}

/// Runs rule scripts one at a time
#[derive(Debug, Clone)]
pub struct RuleExecutor {
    config: ExecutorConfig,
    cancel: CancelFlag,
}

impl RuleExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config,
            cancel: CancelFlag::new(),
        }
    }

    /// Stop reading (and classify as exhausted) once `cancel` is set
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Run one rule script and classify its output.
    ///
    /// Reads stdout line by line until the status marker, the fatal marker,
    /// or the end of output, then terminates the script's process group.
    /// Errors mean the script could not be run at all.
    pub fn execute(&self, rule: &str) -> Result<Outcome, ExecError> {
        let script = rule::script_path(&self.config.rule_dir, rule);
        check_executable(&script)?;

        let command = rule::command_line(&self.config.rule_dir, rule);
        info!(rule, %command, "Running rule");

        let mut guard = ProcessGuard::spawn(shell_command(&command), self.config.terminate_grace)
            .map_err(|source| ExecError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = guard
            .child_mut()
            .stdout
            .take()
            .ok_or(ExecError::MissingPipe("stdout"))?;
        let stderr = guard
            .child_mut()
            .stderr
            .take()
            .ok_or(ExecError::MissingPipe("stderr"))?;

        // stderr is never classified but must be drained so the script
        // cannot block on a full pipe.
        let stderr_tail = spawn_stderr_drain(stderr);
        let lines = spawn_line_reader(stdout);

        let state = self.classify(rule, &lines);
        let outcome = state.outcome().unwrap_or_else(Outcome::exhausted);

        match &state {
            State::Accepted(_) => info!(rule, job_id = %outcome.job_id, "Prover job submitted"),
            State::Fatal(line) => warn!(rule, %line, "Prover reported a fatal error"),
            State::Exhausted | State::Reading => {}
        }

        let status = guard.terminate();
        debug!(rule, ?status, "Rule process terminated");

        if matches!(state, State::Exhausted) {
            if let Ok(tail) = stderr_tail.recv_timeout(STDERR_COLLECTION_TIMEOUT) {
                if !tail.is_empty() {
                    debug!(rule, stderr = %tail.join("\n"), "Rule stderr");
                }
            }
        }

        Ok(outcome)
    }

    /// Drive the state machine until it reaches a terminal state
    fn classify(&self, rule: &str, lines: &Receiver<String>) -> State {
        let mut state = State::Reading;
        let mut last_output = Instant::now();

        while !state.is_terminal() {
            state = match self.next_line(lines, last_output) {
                Next::Line(line) => {
                    last_output = Instant::now();
                    state.on_line(&line)
                }
                Next::Closed => {
                    warn!(rule, "Rule output ended without a job status");
                    state.on_end()
                }
                Next::TimedOut => {
                    warn!(
                        rule,
                        timeout_secs = self.config.read_timeout.map(|t| t.as_secs()),
                        "Rule produced no output within the read timeout"
                    );
                    state.on_end()
                }
                Next::Cancelled => {
                    warn!(rule, "Rule cancelled");
                    state.on_end()
                }
            };
        }

        state
    }

    /// Wait for the next stdout line, waking periodically to honour
    /// cancellation and the optional read timeout.
    fn next_line(&self, lines: &Receiver<String>, last_output: Instant) -> Next {
        loop {
            if self.cancel.is_cancelled() {
                return Next::Cancelled;
            }

            if let Some(timeout) = self.config.read_timeout {
                if last_output.elapsed() >= timeout {
                    return Next::TimedOut;
                }
            }

            match lines.recv_timeout(POLL_INTERVAL) {
                Ok(line) => return Next::Line(line),
                Err(RecvTimeoutError::Disconnected) => return Next::Closed,
                Err(RecvTimeoutError::Timeout) => continue,
            }
        }
    }
}

/// Reject scripts that the shell would fail to run.
fn check_executable(path: &std::path::Path) -> Result<(), ExecError> {
    let meta = fs::metadata(path).map_err(|source| ExecError::ScriptMissing {
        path: path.to_path_buf(),
        source,
    })?;

    if !meta.is_file() || meta.permissions().mode() & 0o111 == 0 {
        return Err(ExecError::NotExecutable {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Call `f` with each line of `stream` until EOF, a read error, or `f`
/// returns false.
///
/// Lines are decoded lossily and lose their `\n` / `\r\n` terminator.
fn for_each_line<R: Read>(stream: R, mut f: impl FnMut(String) -> bool) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                if !f(line.trim_end_matches(['\n', '\r']).to_string()) {
                    break;
                }
            }
        }
    }
}

/// Forward `stream` line by line over a channel.
///
/// The channel disconnects at end of stream; the thread also stops as soon
/// as the receiver is dropped.
pub(crate) fn spawn_line_reader<R: Read + Send + 'static>(stream: R) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || for_each_line(stream, |line| tx.send(line).is_ok()));
    rx
}

/// Drain `stream` to EOF, then send its last few lines.
fn spawn_stderr_drain<R: Read + Send + 'static>(stream: R) -> Receiver<Vec<String>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
        for_each_line(stream, |line| {
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
            true
        });
        let _ = tx.send(tail.into_iter().collect());
    });

    rx
}
