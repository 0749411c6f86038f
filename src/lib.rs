//! forksh - a small fork/exec command interpreter
//!
//! # Overview
//!
//! forksh reads one line at a time and runs it either as a built-in inside
//! the interpreter or as an external program in a child process.
//!
//! ```text
//! : ls -la > listing.txt        # stdout to a file
//! : sort < listing.txt          # stdin from a file
//! : sleep 30 &                  # run without waiting
//! background pid is 4242
//! : echo $$                     # the interpreter's own pid
//! : status                      # how the last foreground command ended
//! exit value 0
//! ```
//!
//! Ctrl+Z (SIGTSTP) toggles foreground-only mode, where a trailing `&` is
//! ignored. Ctrl+C (SIGINT) never stops the interpreter itself; it reaches
//! the running foreground child instead.
//!
//! # Pipeline
//!
//! | Module | Role |
//! |--------|------|
//! | [`lexer`] | split the line on spaces, enforce token limits |
//! | [`expand`] | `$$` to pid |
//! | [`parser`] | build the [`Command`] descriptor |
//! | [`builtins`] | `exit`, `status`, `cd` |
//! | [`executor`] | fork, redirect, exec, wait |
//! | [`jobs`] | background pids and the non-blocking reap sweep |
//! | [`signals`] | SIGINT/SIGTSTP dispositions |
//! | [`state`] | [`ShellState`] and [`Termination`] |
//! | [`shell`] | [`Shell`], which ties the stages together |

pub mod builtins;
pub mod config;
pub mod executor;
pub mod expand;
pub mod jobs;
pub mod lexer;
pub mod parser;
pub mod shell;
pub mod signals;
pub mod state;

pub use builtins::{Builtin, BuiltinError, Flow};
pub use config::Config;
pub use executor::{spawn, ChildHandle, ExecError, SpawnOptions};
pub use lexer::lex;
pub use parser::{parse, Command, ParseError, RedirectOrder};
pub use shell::{Shell, ShellError};
pub use state::{ShellState, Termination};
