use forksh::{Flow, Shell};
use std::io::{self, BufRead, ErrorKind, Write};
use std::process::ExitCode;

/// Why the read loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stop {
    /// The `exit` built-in ran
    Exit,
    /// Input ran out
    Eof,
    /// An unrecoverable error was reported
    Fatal,
}

/// Run a single line, reporting any error on stderr
pub(crate) fn execute_line(shell: &mut Shell, line: &str) -> Option<Stop> {
    match shell.execute_line(line) {
        Ok(Flow::Continue) => None,
        Ok(Flow::Exit) => Some(Stop::Exit),
        Err(e) => {
            eprintln!("forksh: {}", e);
            if e.is_fatal() {
                Some(Stop::Fatal)
            } else {
                None
            }
        }
    }
}

fn show_prompt(prompt: &str) {
    let mut stdout = io::stdout();
    let _ = write!(stdout, "{}", prompt);
    let _ = stdout.flush();
}

/// Read and run lines until `exit`, end of input, or a fatal error
pub(crate) fn run<R: BufRead>(shell: &mut Shell, mut reader: R, prompt: Option<&str>) -> Stop {
    let mut buf = Vec::new();

    loop {
        if let Some(prompt) = prompt {
            show_prompt(prompt);
        }

        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                // Bytes that are not UTF-8 become U+FFFD instead of ending the session
                let line = String::from_utf8_lossy(&buf);
                if let Some(stop) = execute_line(shell, &line) {
                    return stop;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                eprintln!("forksh: error reading input: {}", e);
                break;
            }
        }
    }

    // Last chance to report jobs that finished after the final command
    let _ = shell.reap(&mut io::stdout());
    Stop::Eof
}

/// Exit code for the process once the loop has stopped
pub(crate) fn exit_code(shell: &Shell, stop: Stop, use_status: bool) -> ExitCode {
    match stop {
        Stop::Exit => ExitCode::SUCCESS,
        Stop::Fatal => ExitCode::FAILURE,
        Stop::Eof if use_status => {
            let code = shell.state().last_status.exit_code();
            ExitCode::from((code & 0xff) as u8)
        }
        Stop::Eof => ExitCode::SUCCESS,
    }
}
