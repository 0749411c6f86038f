//! Tokenization for forksh
//!
//! A line is split on the space character only. There is no quoting and no
//! escaping; runs of spaces never produce empty tokens.

use nom::{
    bytes::complete::take_while1,
    character::complete::char,
    multi::{many0, many0_count},
    sequence::delimited,
    IResult,
};

use crate::parser::ParseError;

/// Maximum number of tokens accepted on one line
pub const MAX_TOKENS: usize = 512;

/// Maximum length of a single token, in bytes
pub const MAX_TOKEN_LEN: usize = 2048;

/// Parse a run of spaces (possibly empty)
fn spaces(input: &str) -> IResult<&str, usize> {
    many0_count(char(' '))(input)
}

/// Parse one word surrounded by optional spaces
fn word(input: &str) -> IResult<&str, &str> {
    delimited(spaces, take_while1(|c: char| c != ' '), spaces)(input)
}

/// Strip the line terminator left behind by the line reader
fn strip_newline(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Split a raw input line into word tokens.
///
/// Fails if the line holds more than [`MAX_TOKENS`] tokens or any token is
/// longer than [`MAX_TOKEN_LEN`] bytes.
pub fn lex(line: &str) -> Result<Vec<String>, ParseError> {
    let line = strip_newline(line);

    // `word` always consumes at least one character, so `many0` cannot loop
    // forever; whatever it leaves behind is only spaces.
    let words = match many0(word)(line) {
        Ok((_, words)) => words,
        Err(_) => Vec::new(),
    };

    if words.len() > MAX_TOKENS {
        return Err(ParseError::TooManyTokens {
            count: words.len(),
            max: MAX_TOKENS,
        });
    }

    if let Some(long) = words.iter().find(|w| w.len() > MAX_TOKEN_LEN) {
        return Err(ParseError::TokenTooLong {
            len: long.len(),
            max: MAX_TOKEN_LEN,
        });
    }

    Ok(words.into_iter().map(String::from).collect())
}
