//! forksh - a small fork/exec command interpreter
//!
//! Usage:
//!   forksh              Start interactive mode
//!   forksh -c "cmd"     Execute a single command
//!   forksh script       Execute each line of a file

mod cli;
mod rcfile;
mod repl;

use cli::{parse_args, print_help, print_version};
use forksh::{signals, Config, Flow, Shell};
use repl::{exit_code, Stop};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by FORKSH_LOG (quiet by default)
fn init_logging() {
    let filter = EnvFilter::try_from_env(forksh::config::LOG_VAR)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args);

    if cli.help {
        print_help();
        return ExitCode::SUCCESS;
    }
    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }
    if let Some(flag) = &cli.unknown {
        eprintln!("forksh: unknown option: {}", flag);
        eprintln!("Try 'forksh --help' for usage.");
        return ExitCode::from(2);
    }

    init_logging();

    let mut config = Config::from_env();
    if cli.bg_interruptible {
        config.interruptible_background = true;
    }
    if cli.norc {
        config.rc_file = None;
    }

    let mut shell = Shell::new(config);

    if let Err(e) = signals::install(shell.state().foreground_only_flag()) {
        eprintln!("forksh: {}", e);
        return ExitCode::FAILURE;
    }

    if let Some(command) = cli.command {
        let stop = repl::execute_line(&mut shell, &command).unwrap_or(Stop::Eof);
        return exit_code(&shell, stop, true);
    }

    if let Some(path) = cli.script {
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("forksh: {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        };
        let stop = repl::run(&mut shell, BufReader::new(file), None);
        return exit_code(&shell, stop, true);
    }

    if let Some(rc) = shell.config().rc_file.clone() {
        if rcfile::load_rc(&mut shell, &rc, "~/.forkshrc") == Flow::Exit {
            return ExitCode::SUCCESS;
        }
    }

    let prompt = shell.config().prompt.clone();
    let stdin = io::stdin();
    let stop = repl::run(&mut shell, stdin.lock(), Some(&prompt));
    exit_code(&shell, stop, false)
}
