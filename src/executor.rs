//! Executor: runs external programs in a forked child
//!
//! [`spawn`] is the single fork/exec entry point. Redirection files are opened
//! inside the child, after the fork, so the interpreter never holds them.
//! The parent gets a [`ChildHandle`] that can be waited on or polled.
//!
//! Everything the child needs (argv, paths, error text) is built before the
//! fork. Between fork and exec the child only makes raw system calls.

use std::ffi::CString;
use std::io::{self, Write};
use std::os::raw::c_char;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use nix::errno::Errno;
use nix::fcntl::{open, OFlag};
use nix::sys::stat::Mode;
use nix::sys::wait::{waitpid, WaitPidFlag};
use nix::unistd::{close, dup2, fork, ForkResult, Pid};
use thiserror::Error;
use tracing::debug;

use crate::parser::{Command, RedirectOrder};
use crate::signals;
use crate::state::Termination;

/// Exit status of a child whose redirection file could not be opened
pub const REDIRECT_FAILURE_STATUS: i32 = 255;

/// Exit status of a child whose program could not be executed
pub const EXEC_FAILURE_STATUS: i32 = 1;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("fork failed: {0}")]
    Fork(Errno),
    #[error("argument contains a NUL byte: {0:?}")]
    NulByte(String),
    #[error("wait for pid {pid} failed: {source}")]
    Wait { pid: Pid, source: Errno },
}

impl ExecError {
    /// Process creation failures end the interpreter
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExecError::Fork(_))
    }
}

/// Which standard stream a redirection replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    fn target_fd(self) -> i32 {
        match self {
            Direction::Input => libc::STDIN_FILENO,
            Direction::Output => libc::STDOUT_FILENO,
        }
    }

    fn flags(self) -> OFlag {
        match self {
            Direction::Input => OFlag::O_RDONLY,
            Direction::Output => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

/// A redirection ready to be applied in the child
#[derive(Debug, Clone)]
struct Redirect {
    path: CString,
    direction: Direction,
    /// `cannot open <path> for <direction>: `, completed with the errno text
    failure: Vec<u8>,
}

impl Redirect {
    fn new(path: &Path, direction: Direction) -> Result<Self, ExecError> {
        Ok(Redirect {
            path: to_cstring(path.as_os_str().as_bytes())?,
            direction,
            failure: format!("cannot open {} for {}: ", path.display(), direction).into_bytes(),
        })
    }

    /// Open the file and move it onto the standard stream
    fn apply(&self) -> Result<(), Errno> {
        let fd = open(self.path.as_c_str(), self.direction.flags(), Mode::from_bits_truncate(0o644))?;
        let target = self.direction.target_fd();
        if fd != target {
            dup2(fd, target)?;
            let _ = close(fd);
        }
        Ok(())
    }
}

/// Redirections in the order their markers appeared on the line
fn redirects(cmd: &Command) -> Result<Vec<Redirect>, ExecError> {
    let input = cmd.input_path.as_ref().map(|path| (path, Direction::Input));
    let output = cmd.output_path.as_ref().map(|path| (path, Direction::Output));

    let ordered = match cmd.redirect_order {
        RedirectOrder::OutputFirst => [output, input],
        RedirectOrder::InputFirst | RedirectOrder::None => [input, output],
    };
    ordered
        .into_iter()
        .flatten()
        .map(|(path, direction)| Redirect::new(path, direction))
        .collect()
}

fn to_cstring(bytes: &[u8]) -> Result<CString, ExecError> {
    CString::new(bytes).map_err(|_| ExecError::NulByte(String::from_utf8_lossy(bytes).into_owned()))
}

/// Program arguments in the NULL-terminated form `execvp` takes
struct Argv {
    // Owns the strings `ptrs` points into
    _args: Vec<CString>,
    ptrs: Vec<*const c_char>,
    not_found: Vec<u8>,
    exec_failure: Vec<u8>,
}

impl Argv {
    fn new(cmd: &Command) -> Result<Self, ExecError> {
        let args = cmd
            .args
            .iter()
            .map(|arg| to_cstring(arg.as_bytes()))
            .collect::<Result<Vec<_>, _>>()?;
        let mut ptrs: Vec<*const c_char> = args.iter().map(|arg| arg.as_ptr()).collect();
        ptrs.push(ptr::null());

        let program = cmd.program();
        Ok(Argv {
            _args: args,
            ptrs,
            not_found: format!("{}: command not found\n", program).into_bytes(),
            exec_failure: format!("{}: ", program).into_bytes(),
        })
    }
}

/// Knobs for [`spawn`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnOptions {
    /// Let SIGINT kill background children too
    pub interruptible_background: bool,
}

/// A running child process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildHandle {
    pid: Pid,
}

impl ChildHandle {
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Block until this child terminates
    pub fn wait(&self) -> Result<Termination, ExecError> {
        loop {
            match waitpid(self.pid, None) {
                Ok(status) => {
                    if let Some((_, termination)) = Termination::from_wait_status(status) {
                        return Ok(termination);
                    }
                }
                Err(Errno::EINTR) => continue,
                Err(source) => return Err(ExecError::Wait { pid: self.pid, source }),
            }
        }
    }

    /// Poll this child without blocking; `None` while it is still running
    pub fn try_wait(&self) -> Result<Option<Termination>, ExecError> {
        match waitpid(self.pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(status) => Ok(Termination::from_wait_status(status).map(|(_, t)| t)),
            Err(Errno::EINTR) => Ok(None),
            Err(source) => Err(ExecError::Wait { pid: self.pid, source }),
        }
    }
}

/// Write prebuilt message pieces straight to fd 2 and leave the child
fn child_fail(parts: &[&[u8]], status: i32) -> ! {
    for part in parts {
        unsafe {
            libc::write(libc::STDERR_FILENO, part.as_ptr().cast(), part.len());
        }
    }
    unsafe { libc::_exit(status) }
}

/// Everything the child does between fork and exec
fn run_child(argv: &Argv, redirects: &[Redirect], interruptible: bool) -> ! {
    signals::reset_for_child(interruptible);

    for redirect in redirects {
        if let Err(errno) = redirect.apply() {
            child_fail(
                &[&redirect.failure, errno.desc().as_bytes(), b"\n"],
                REDIRECT_FAILURE_STATUS,
            );
        }
    }

    unsafe {
        libc::execvp(argv.ptrs[0], argv.ptrs.as_ptr());
    }
    match Errno::last() {
        Errno::ENOENT => child_fail(&[&argv.not_found], EXEC_FAILURE_STATUS),
        errno => child_fail(
            &[&argv.exec_failure, errno.desc().as_bytes(), b"\n"],
            EXEC_FAILURE_STATUS,
        ),
    }
}

/// Fork a child for `cmd` and exec its program.
///
/// The child applies the command's redirections and signal dispositions
/// first. Errors from inside the child only show up as its exit status.
pub fn spawn(cmd: &Command, options: &SpawnOptions) -> Result<ChildHandle, ExecError> {
    let argv = Argv::new(cmd)?;
    let redirects = redirects(cmd)?;
    let interruptible = !cmd.background || options.interruptible_background;

    debug!(
        args = ?cmd.args,
        input = ?cmd.input_path,
        output = ?cmd.output_path,
        order = ?cmd.redirect_order,
        background = cmd.background,
        "spawning"
    );

    // Anything still buffered would otherwise be written twice
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();

    match unsafe { fork() } {
        Ok(ForkResult::Child) => run_child(&argv, &redirects, interruptible),
        Ok(ForkResult::Parent { child }) => {
            debug!(pid = %child, "spawned");
            Ok(ChildHandle { pid: child })
        }
        Err(errno) => Err(ExecError::Fork(errno)),
    }
}
