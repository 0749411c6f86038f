//! Command descriptor builder for forksh
//!
//! Turns expanded tokens into a [`Command`]: argument vector, optional input
//! and output redirection targets, and the background flag.

use std::path::PathBuf;
use thiserror::Error;

/// Token that marks background execution when it is the last one on the line
pub const BACKGROUND_MARKER: &str = "&";
/// Input redirection marker
pub const INPUT_MARKER: &str = "<";
/// Output redirection marker
pub const OUTPUT_MARKER: &str = ">";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("too many arguments: {count} (max {max})")]
    TooManyTokens { count: usize, max: usize },
    #[error("argument too long: {len} bytes (max {max})")]
    TokenTooLong { len: usize, max: usize },
    #[error("no file specified after '{0}'")]
    MissingRedirectTarget(String),
    #[error("no command specified")]
    MissingCommand,
}

/// Which redirection marker appeared first on the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectOrder {
    InputFirst,
    OutputFirst,
    #[default]
    None,
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Program name followed by its arguments
    pub args: Vec<String>,
    /// File to read standard input from
    pub input_path: Option<PathBuf>,
    /// File to write standard output to
    pub output_path: Option<PathBuf>,
    pub redirect_order: RedirectOrder,
    /// Run without waiting
    pub background: bool,
}

impl Command {
    /// Program name (`args[0]`)
    pub fn program(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or("")
    }
}

/// True for lines that produce no command: nothing at all, or a comment
pub fn is_ignored(tokens: &[String]) -> bool {
    match tokens.first() {
        None => true,
        Some(first) => first.is_empty() || first.starts_with('#'),
    }
}

fn is_marker(token: &str) -> bool {
    token == INPUT_MARKER || token == OUTPUT_MARKER
}

/// Build a [`Command`] from expanded tokens.
///
/// Returns `Ok(None)` for blank and comment lines. When `foreground_only` is
/// set a trailing `&` is still removed but the command runs in the
/// foreground.
pub fn parse(
    mut tokens: Vec<String>,
    foreground_only: bool,
) -> Result<Option<Command>, ParseError> {
    if is_ignored(&tokens) {
        return Ok(None);
    }

    let mut background = false;
    if tokens.last().map(String::as_str) == Some(BACKGROUND_MARKER) {
        tokens.pop();
        background = true;
    }

    let mut args = Vec::with_capacity(tokens.len());
    let mut input_path = None;
    let mut output_path = None;
    let mut redirect_order = RedirectOrder::None;

    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        if !is_marker(&token) {
            args.push(token);
            continue;
        }

        let target = match iter.next() {
            Some(path) if !is_marker(&path) => PathBuf::from(path),
            _ => return Err(ParseError::MissingRedirectTarget(token)),
        };

        if token == INPUT_MARKER {
            if redirect_order == RedirectOrder::None {
                redirect_order = RedirectOrder::InputFirst;
            }
            input_path = Some(target);
        } else {
            if redirect_order == RedirectOrder::None {
                redirect_order = RedirectOrder::OutputFirst;
            }
            output_path = Some(target);
        }
    }

    if args.is_empty() {
        return Err(ParseError::MissingCommand);
    }

    Ok(Some(Command {
        args,
        input_path,
        output_path,
        redirect_order,
        background: background && !foreground_only,
    }))
}
