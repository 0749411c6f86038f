//! Integration tests for command parsing, built-ins and foreground execution

#[path = "common/mod.rs"]
mod common;
use common::{forksh, session};

use std::fs;
use std::os::unix::fs::PermissionsExt;

/// `echo hi` runs, then `status` reports a clean exit
#[test]
fn test_echo_then_status() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _) = session(dir.path(), "echo hi\nstatus\n");
    assert_eq!(stdout, "hi\nexit value 0\n");
}

/// Output of one command redirected to a file is read back by the next
#[test]
fn test_output_then_input_redirect() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("marker.txt"), "x").unwrap();

    let (stdout, _) = session(dir.path(), "ls > out.txt\ncat < out.txt\n");

    let listing = fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert!(listing.contains("marker.txt"));
    assert_eq!(stdout, listing);
}

/// Marker order does not change where stdin and stdout end up
#[test]
fn test_redirect_order_is_irrelevant() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("in.txt"), "pear\napple\n").unwrap();

    session(dir.path(), "sort < in.txt > a.txt\nsort > b.txt < in.txt\n");

    let a = fs::read_to_string(dir.path().join("a.txt")).unwrap();
    let b = fs::read_to_string(dir.path().join("b.txt")).unwrap();
    assert_eq!(a, "apple\npear\n");
    assert_eq!(a, b);
}

/// `$$$$` expands to the pid twice with no separator
#[test]
fn test_pid_expansion() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _) = session(dir.path(), "echo $$$$\necho $$\n");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    let pid = lines[1];
    assert!(pid.parse::<u32>().is_ok());
    assert_eq!(lines[0], format!("{}{}", pid, pid));
}

/// Unknown programs fail in the child with status 1
#[test]
fn test_command_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr) = session(dir.path(), "badcmd\nstatus\n");
    assert!(stderr.contains("badcmd: command not found"));
    assert_eq!(stdout, "exit value 1\n");
}

/// A missing input file is reported by the child, which exits 255
#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr) = session(dir.path(), "cat < missing.txt\nstatus\n");
    assert!(stderr.contains("cannot open missing.txt for input"));
    assert_eq!(stdout, "exit value 255\n");
}

/// A foreground child killed by a signal is reported as such
#[test]
fn test_status_after_signal() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("killme.sh");
    fs::write(&script, "#!/bin/sh\nkill -TERM $$\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let (stdout, _) = session(dir.path(), "./killme.sh\nstatus\n");
    assert_eq!(stdout, "terminated by signal 15\n");
}

/// Built-ins never change the last status
#[test]
fn test_builtins_keep_status() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _) = session(dir.path(), "false\ncd .\nstatus\nstatus\n");
    assert_eq!(stdout, "exit value 1\nexit value 1\n");
}

/// Comments and blank lines produce nothing and keep the last status
#[test]
fn test_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr) = session(dir.path(), "false\n# a comment\n\n     \n#echo no\nstatus\n");
    assert_eq!(stdout, "exit value 1\n");
    assert!(stderr.is_empty());
}

/// A line that is not valid UTF-8 does not end the session
#[test]
fn test_invalid_utf8_line_keeps_reading() {
    let dir = tempfile::tempdir().unwrap();
    let output = forksh(dir.path())
        .write_stdin(&b"echo before\necho \xff\xfe\necho after\nstatus\n"[..])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.starts_with("before\n"), "stdout: {}", stdout);
    assert!(stdout.ends_with("after\nexit value 0\n"), "stdout: {}", stdout);
    assert!(output.stderr.is_empty());
}

/// A redirection marker without a file is a parse error, not fatal
#[test]
fn test_parse_error_reprompts() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr) = session(dir.path(), "cat <\necho still here\n");
    assert!(stderr.contains("no file specified after '<'"));
    assert_eq!(stdout, "still here\n");
}

/// Lines beyond the token limit are rejected
#[test]
fn test_too_many_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let line = format!("echo {}\n", vec!["x"; 600].join(" "));
    let (stdout, stderr) = session(dir.path(), &line);
    assert!(stderr.contains("too many arguments"));
    assert!(stdout.is_empty());
}

/// `exit` stops immediately with success
#[test]
fn test_exit_stops_reading() {
    let dir = tempfile::tempdir().unwrap();
    forksh(dir.path())
        .write_stdin("false\nexit\necho after\n")
        .assert()
        .success()
        .stdout("");
}

/// `cd dir` changes the directory seen by later children
#[test]
fn test_cd_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    let expected = dir.path().join("sub").canonicalize().unwrap();

    let (stdout, _) = session(dir.path(), "cd sub\npwd\n");
    assert_eq!(stdout.trim_end(), expected.to_str().unwrap());
}

/// `cd` with no argument goes to $HOME
#[test]
fn test_cd_home() {
    let home = tempfile::tempdir().unwrap();
    let start = tempfile::tempdir().unwrap();
    let expected = home.path().canonicalize().unwrap();

    let output = forksh(home.path())
        .current_dir(start.path())
        .write_stdin("cd\npwd\n")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), expected.to_str().unwrap());
}

/// A failed `cd` reports the path and stays put
#[test]
fn test_cd_failure_stays_put() {
    let dir = tempfile::tempdir().unwrap();
    let expected = dir.path().canonicalize().unwrap();

    let (stdout, stderr) = session(dir.path(), "cd nowhere\npwd\n");
    assert!(stderr.contains("cd: nowhere"));
    assert_eq!(stdout.trim_end(), expected.to_str().unwrap());
}

/// `-c` runs one line and exits with its status
#[test]
fn test_single_command_mode() {
    let dir = tempfile::tempdir().unwrap();
    forksh(dir.path())
        .args(["-c", "echo", "hello"])
        .assert()
        .success()
        .stdout("hello\n");

    forksh(dir.path()).args(["-c", "false"]).assert().code(1);
}

/// A script file runs line by line without a prompt
#[test]
fn test_script_mode() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("run.fsh"), "# script\necho one\necho two > two.txt\ncat two.txt\n").unwrap();

    forksh(dir.path())
        .arg("run.fsh")
        .env("FORKSH_PROMPT", ": ")
        .assert()
        .success()
        .stdout("one\ntwo\n");
}

/// The prompt is printed before every line
#[test]
fn test_prompt_printed() {
    let dir = tempfile::tempdir().unwrap();
    let output = forksh(dir.path())
        .env("FORKSH_PROMPT", ": ")
        .write_stdin("echo hi\n")
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout), ": hi\n: ");
}

/// The rc file runs before the first prompt unless --norc is given
#[test]
fn test_rc_file() {
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join(".forkshrc"), "echo from-rc\n").unwrap();

    let output = assert_cmd::Command::cargo_bin("forksh")
        .unwrap()
        .env("HOME", home.path())
        .env("FORKSH_PROMPT", "")
        .current_dir(home.path())
        .write_stdin("echo typed\n")
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout), "from-rc\ntyped\n");

    let (stdout, _) = session(home.path(), "echo typed\n");
    assert_eq!(stdout, "typed\n");
}

/// Unknown flags are rejected
#[test]
fn test_unknown_option() {
    let dir = tempfile::tempdir().unwrap();
    forksh(dir.path())
        .arg("--bogus")
        .assert()
        .code(2)
        .stderr(predicates::str::contains("unknown option: --bogus"));
}
