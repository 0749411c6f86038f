//! Built-in commands: `exit`, `status`, `cd`
//!
//! Built-ins run inside the interpreter and are never forked. None of them
//! changes `last_status`.

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::Command;
use crate::state::ShellState;

#[derive(Error, Debug)]
pub enum BuiltinError {
    #[error("cd: {}: {source}", .path.display())]
    Cd { path: PathBuf, source: io::Error },
    #[error("cd: HOME not set")]
    HomeNotSet,
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// What the interpreter loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Status,
    Cd,
}

impl Builtin {
    /// Match a program name, checked as `exit`, `status`, `cd` in that order
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "exit" => Some(Builtin::Exit),
            "status" => Some(Builtin::Status),
            "cd" => Some(Builtin::Cd),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Status => "status",
            Builtin::Cd => "cd",
        }
    }

    /// Run the built-in; output goes to `out`
    pub fn run<W: Write>(&self, cmd: &Command, state: &ShellState, out: &mut W) -> Result<Flow, BuiltinError> {
        match self {
            Builtin::Exit => Ok(Flow::Exit),
            Builtin::Status => {
                builtin_status(state, out)?;
                Ok(Flow::Continue)
            }
            Builtin::Cd => {
                builtin_cd(cmd.args.get(1).map(String::as_str))?;
                Ok(Flow::Continue)
            }
        }
    }
}

fn builtin_status<W: Write>(state: &ShellState, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", state.last_status)?;
    out.flush()
}

/// Where `cd` goes: the argument, or `$HOME`
pub fn cd_target(arg: Option<&str>) -> Result<PathBuf, BuiltinError> {
    match arg {
        Some(path) => Ok(PathBuf::from(path)),
        None => env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .ok_or(BuiltinError::HomeNotSet),
    }
}

/// Change the working directory; on failure it stays where it was
fn builtin_cd(arg: Option<&str>) -> Result<(), BuiltinError> {
    let dir = cd_target(arg)?;
    env::set_current_dir(&dir).map_err(|source| BuiltinError::Cd { path: dir, source })
}
