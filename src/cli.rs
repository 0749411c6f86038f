const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parsed command-line arguments
#[derive(Debug, Default, PartialEq)]
pub(crate) struct CliArgs {
    pub(crate) command: Option<String>,
    pub(crate) script: Option<String>,
    pub(crate) help: bool,
    pub(crate) version: bool,
    pub(crate) norc: bool,
    pub(crate) bg_interruptible: bool,
    pub(crate) unknown: Option<String>,
}

/// Parse command-line arguments
pub(crate) fn parse_args(args: &[String]) -> CliArgs {
    let mut cli = CliArgs::default();

    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "--norc" => {
                cli.norc = true;
            }
            "--bg-interruptible" => {
                cli.bg_interruptible = true;
            }
            "-c" => {
                // Everything after -c is the command
                if i + 1 < args.len() {
                    cli.command = Some(args[i + 1..].join(" "));
                }
                break;
            }
            "--help" | "-h" => {
                cli.help = true;
            }
            "--version" | "-V" => {
                cli.version = true;
            }
            arg if arg.starts_with('-') => {
                cli.unknown = Some(arg.to_string());
            }
            path => {
                cli.script = Some(path.to_string());
            }
        }
        i += 1;
    }

    cli
}

pub(crate) fn print_help() {
    println!(
        r#"forksh {} - a small fork/exec command interpreter

USAGE:
    forksh                      Start interactive mode
    forksh -c <command>         Execute a single command
    forksh <script>             Execute each line of a file
    forksh --norc               Skip ~/.forkshrc
    forksh --bg-interruptible   Let Ctrl+C reach background jobs too
    forksh --help               Show this help message
    forksh --version            Show version

SYNTAX:
    cmd arg ...                 Run a program found on PATH
    cmd < file                  Read stdin from file
    cmd > file                  Write stdout to file (truncates)
    cmd ... &                   Run in the background (last word only)
    $$                          Expands to the interpreter's pid
    # comment                   Line is ignored

BUILT-INS:
    exit                        Leave the interpreter
    status                      Show how the last foreground command ended
    cd [dir]                    Change directory (default: $HOME)

SIGNALS:
    Ctrl+C                      Interrupts the foreground command only
    Ctrl+Z                      Toggles foreground-only mode (& ignored)

ENVIRONMENT:
    FORKSH_PROMPT               Prompt string (default ": ")
    FORKSH_BG_INTERRUPTIBLE=1   Same as --bg-interruptible
    FORKSH_LOG                  Log filter, e.g. "debug" (default "warn")
"#,
        VERSION
    );
}

pub(crate) fn print_version() {
    println!("forksh {}", VERSION);
}
