//! Background job tracking and reaping
//!
//! Background children are recorded by pid when launched. After every
//! dispatch cycle the shell runs a sweep that collects every child that has
//! already finished, without ever blocking.

use std::collections::BTreeSet;
use std::io::{self, Write};

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::debug;

use crate::state::{ShellState, Termination};

/// Set of live background pids
#[derive(Debug, Default)]
pub struct JobTable {
    pids: BTreeSet<Pid>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pid: Pid) {
        self.pids.insert(pid);
    }

    /// Remove a pid; true if it was tracked
    pub fn remove(&mut self, pid: Pid) -> bool {
        self.pids.remove(&pid)
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.pids.contains(&pid)
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }
}

/// One child collected by a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaped {
    pub pid: Pid,
    pub termination: Termination,
    /// Whether the pid was in the job table
    pub was_background: bool,
}

/// Non-blocking poll for any finished child
fn poll_any_child() -> nix::Result<WaitStatus> {
    waitpid(None::<Pid>, Some(WaitPidFlag::WNOHANG))
}

/// Collect every child that has already terminated.
///
/// Each reaped child is removed from the job table and reported on `out` as
/// `background pid <pid> is done: <termination>`. `last_status` changes only
/// when the pid is the most recently waited foreground child.
pub fn sweep<W: Write>(state: &mut ShellState, out: &mut W) -> io::Result<Vec<Reaped>> {
    sweep_with(state, out, poll_any_child)
}

/// [`sweep`] with an explicit polling source
pub fn sweep_with<W, F>(state: &mut ShellState, out: &mut W, mut poll: F) -> io::Result<Vec<Reaped>>
where
    W: Write,
    F: FnMut() -> nix::Result<WaitStatus>,
{
    let mut reaped = Vec::new();

    loop {
        let status = match poll() {
            Ok(WaitStatus::StillAlive) => break,
            Ok(status) => status,
            Err(Errno::EINTR) => continue,
            // ECHILD: nothing left to wait for
            Err(_) => break,
        };

        // Stop/continue notifications are not requested, skip anything else
        let (pid, termination) = match Termination::from_wait_status(status) {
            Some(done) => done,
            None => continue,
        };

        let was_background = state.jobs.remove(pid);
        if state.last_foreground == Some(pid) {
            state.last_status = termination;
        }

        debug!(pid = %pid, status = %termination, background = was_background, "reaped child");
        writeln!(out, "background pid {} is done: {}", pid, termination)?;

        reaped.push(Reaped {
            pid,
            termination,
            was_background,
        });
    }

    out.flush()?;
    Ok(reaped)
}
