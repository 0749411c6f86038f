//! Shell state shared between the pipeline stages
//!
//! Everything here is owned by the interpreter's main loop and mutated only
//! by the main process. The foreground-only flag is the one exception: the
//! SIGTSTP handler holds a clone of it.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;

use crate::jobs::JobTable;

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Normal exit with the given code
    Exited(i32),
    /// Killed by the given signal number
    Signaled(i32),
}

impl Termination {
    /// Convert a reaped wait status; `None` for states that are not final
    pub fn from_wait_status(status: WaitStatus) -> Option<(Pid, Termination)> {
        match status {
            WaitStatus::Exited(pid, code) => Some((pid, Termination::Exited(code))),
            WaitStatus::Signaled(pid, signal, _) => Some((pid, Termination::Signaled(signal as i32))),
            _ => None,
        }
    }

    /// Process exit code equivalent, using the usual `128 + signal` convention
    pub fn exit_code(&self) -> i32 {
        match self {
            Termination::Exited(code) => *code,
            Termination::Signaled(signal) => 128 + signal,
        }
    }
}

impl Default for Termination {
    fn default() -> Self {
        Termination::Exited(0)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exited(code) => write!(f, "exit value {}", code),
            Termination::Signaled(signal) => write!(f, "terminated by signal {}", signal),
        }
    }
}

/// State that persists between input lines
#[derive(Debug, Default)]
pub struct ShellState {
    /// Result of the most recent foreground command
    pub last_status: Termination,
    /// Pid of the most recently waited foreground child
    pub last_foreground: Option<Pid>,
    /// Live background children
    pub jobs: JobTable,
    foreground_only: Arc<AtomicBool>,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a trailing `&` is currently ignored
    pub fn is_foreground_only(&self) -> bool {
        self.foreground_only.load(Ordering::SeqCst)
    }

    pub fn set_foreground_only(&self, on: bool) {
        self.foreground_only.store(on, Ordering::SeqCst);
    }

    /// Handle to the flag for the signal handler
    pub fn foreground_only_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.foreground_only)
    }

    /// Record the result of a foreground child
    pub fn record_foreground(&mut self, pid: Pid, termination: Termination) {
        self.last_foreground = Some(pid);
        self.last_status = termination;
    }
}
