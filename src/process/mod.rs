//! Child process ownership for rule scripts
//!
//! Rule scripts usually start a long-running prover client and exit only
//! when it does. Each script is spawned as the leader of its own process
//! group so that termination reaches everything it started, and the
//! [`ProcessGuard`] makes sure that group is signalled and the leader is
//! reaped on every exit path, including early returns and panics.

use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Build a `sh -c <command>` invocation with piped stdout/stderr.
///
/// The command string is passed as a single argument to the shell.
pub fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

/// Owns a spawned child and terminates its process group when dropped
#[derive(Debug)]
pub struct ProcessGuard {
    child: Child,
    grace: Duration,
    reaped: Option<ExitStatus>,
}

impl ProcessGuard {
    /// Spawn `cmd` as the leader of a new process group.
    pub fn spawn(mut cmd: Command, grace: Duration) -> io::Result<Self> {
        cmd.process_group(0);
        let child = cmd.spawn()?;
        debug!(pid = child.id(), "Spawned rule process");
        Ok(Self {
            child,
            grace,
            reaped: None,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn child_mut(&mut self) -> &mut Child {
        &mut self.child
    }

    /// Terminate the process group and reap the leader.
    ///
    /// Sends SIGTERM whether or not the leader has already exited (its
    /// children may still be running), waits up to the grace period, then
    /// escalates to SIGKILL. Returns the leader's exit status when it could
    /// be collected.
    pub fn terminate(mut self) -> Option<ExitStatus> {
        self.terminate_inner()
    }

    fn terminate_inner(&mut self) -> Option<ExitStatus> {
        if let Some(status) = self.reaped {
            return Some(status);
        }

        signal_group(self.child.id(), Signal::SIGTERM);

        let status = match self.child.wait_timeout(self.grace) {
            Ok(Some(status)) => Some(status),
            Ok(None) => {
                warn!(
                    pid = self.child.id(),
                    grace_secs = self.grace.as_secs(),
                    "Rule process ignored SIGTERM, killing"
                );
                signal_group(self.child.id(), Signal::SIGKILL);
                self.child.wait().ok()
            }
            Err(e) => {
                warn!(pid = self.child.id(), error = %e, "Failed to wait for rule process");
                let _ = self.child.kill();
                self.child.wait().ok()
            }
        };

        self.reaped = status;
        status
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        self.terminate_inner();
    }
}

/// Best-effort signal to the process group led by `pid`.
///
/// A group that no longer exists is not an error.
fn signal_group(pid: u32, signal: Signal) {
    let Ok(raw) = i32::try_from(pid) else {
        return;
    };

    match killpg(Pid::from_raw(raw), signal) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => debug!(pid, ?signal, error = %e, "Failed to signal process group"),
    }
}
