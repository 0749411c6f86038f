//! Common test utilities for forksh integration tests

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, ChildStdout, Stdio};

#[allow(unused_imports)]
pub use assert_cmd::Command;

/// The forksh binary with a clean environment: empty prompt, no rc file,
/// HOME pointed at `home`
#[allow(dead_code)]
pub fn forksh(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("forksh").unwrap();
    cmd.arg("--norc")
        .env("HOME", home)
        .env("FORKSH_PROMPT", "")
        .env_remove("FORKSH_BG_INTERRUPTIBLE")
        .env_remove("FORKSH_LOG")
        .current_dir(home);
    cmd
}

/// Feed `input` to a fresh interpreter and return (stdout, stderr)
#[allow(dead_code)]
pub fn session(home: &Path, input: &str) -> (String, String) {
    let output = forksh(home).write_stdin(input).output().unwrap();
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// Spawn the interpreter with piped stdin/stdout for tests that need to
/// interact with it while it runs. It gets its own process group.
#[allow(dead_code)]
pub fn spawn_interactive(home: &Path) -> Child {
    use std::os::unix::process::CommandExt;

    std::process::Command::new(assert_cmd::cargo::cargo_bin("forksh"))
        .arg("--norc")
        .env("HOME", home)
        .env("FORKSH_PROMPT", "")
        .env_remove("FORKSH_BG_INTERRUPTIBLE")
        .env_remove("FORKSH_LOG")
        .current_dir(home)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()
        .unwrap()
}

/// Read lines until one contains `needle`; returns everything read
#[allow(dead_code)]
pub fn read_until(reader: &mut BufReader<ChildStdout>, needle: &str) -> String {
    let mut seen = String::new();
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).unwrap();
        if n == 0 {
            panic!("EOF before {:?}; got {:?}", needle, seen);
        }
        seen.push_str(&line);
        if line.contains(needle) {
            return seen;
        }
    }
}
