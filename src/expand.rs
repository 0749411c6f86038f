//! `$$` expansion
//!
//! Each occurrence of `$$` in a token becomes the interpreter's own process
//! id. Matches never overlap: `$$$$` expands twice and `$$$` leaves the
//! trailing `$` alone.

/// The two-character marker that expands to the interpreter pid
pub const PID_MARKER: &str = "$$";

/// Expand every `$$` in a single token
pub fn expand_pid(token: &str, pid: u32) -> String {
    if !token.contains(PID_MARKER) {
        return token.to_string();
    }
    // `str::replace` scans left to right and resumes after each match
    token.replace(PID_MARKER, &pid.to_string())
}

/// Expand every token of a line; each token is rewritten on its own
pub fn expand_tokens(tokens: Vec<String>, pid: u32) -> Vec<String> {
    tokens
        .into_iter()
        .map(|token| expand_pid(&token, pid))
        .collect()
}
