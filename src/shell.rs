//! Shell - the central coordinator for forksh
//!
//! The Shell owns all state and runs one input line through the pipeline:
//! 1. Tokenize (lexer)
//! 2. Expand `$$` (expand)
//! 3. Build the command descriptor (parser)
//! 4. Run a built-in, or fork/exec the program (builtins, executor)
//! 5. Reap finished children (jobs)

use std::io::{self, Write};

use thiserror::Error;
use tracing::debug;

use crate::builtins::{Builtin, BuiltinError, Flow};
use crate::config::Config;
use crate::executor::{self, ExecError};
use crate::expand::expand_tokens;
use crate::jobs::{self, Reaped};
use crate::lexer::lex;
use crate::parser::{self, Command, ParseError};
use crate::state::ShellState;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Builtin(#[from] BuiltinError),
    #[error("{0}")]
    Exec(#[from] ExecError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Whether the interpreter has to stop
    pub fn is_fatal(&self) -> bool {
        match self {
            ShellError::Exec(err) => err.is_fatal(),
            _ => false,
        }
    }
}

/// The interpreter: configuration plus the state carried between lines
pub struct Shell {
    state: ShellState,
    config: Config,
    pid: u32,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Shell {
    pub fn new(config: Config) -> Self {
        Shell {
            state: ShellState::new(),
            config,
            pid: std::process::id(),
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The pid that `$$` expands to
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Tokenize, expand and parse one line
    pub fn parse_line(&self, line: &str) -> Result<Option<Command>, ParseError> {
        let tokens = expand_tokens(lex(line)?, self.pid);
        parser::parse(tokens, self.state.is_foreground_only())
    }

    /// Run one line, writing to standard output
    pub fn execute_line(&mut self, line: &str) -> Result<Flow, ShellError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.execute_line_to(line, &mut out)
    }

    /// Run one line and then sweep finished children.
    ///
    /// `exit` returns [`Flow::Exit`] straight away without sweeping.
    pub fn execute_line_to<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow, ShellError> {
        let result = match self.parse_line(line) {
            Ok(Some(cmd)) => self.dispatch(&cmd, out),
            Ok(None) => Ok(Flow::Continue),
            Err(err) => Err(err.into()),
        };

        if let Ok(Flow::Exit) = result {
            return result;
        }

        let swept = self.reap(out);
        let flow = result?;
        swept?;
        Ok(flow)
    }

    /// Run a parsed command: built-in if it names one, else a child process
    pub fn dispatch<W: Write>(&mut self, cmd: &Command, out: &mut W) -> Result<Flow, ShellError> {
        debug!(
            args = ?cmd.args,
            order = ?cmd.redirect_order,
            background = cmd.background,
            "dispatch"
        );

        if let Some(builtin) = Builtin::lookup(cmd.program()) {
            debug!(builtin = builtin.name(), "running built-in");
            return Ok(builtin.run(cmd, &self.state, out)?);
        }

        let child = executor::spawn(cmd, &self.config.spawn_options())?;

        if cmd.background {
            self.state.jobs.insert(child.pid());
            writeln!(out, "background pid is {}", child.pid())?;
            out.flush()?;
        } else {
            let termination = child.wait()?;
            debug!(pid = %child.pid(), status = %termination, "foreground child finished");
            self.state.record_foreground(child.pid(), termination);
        }

        Ok(Flow::Continue)
    }

    /// Collect finished children without blocking
    pub fn reap<W: Write>(&mut self, out: &mut W) -> io::Result<Vec<Reaped>> {
        jobs::sweep(&mut self.state, out)
    }
}
