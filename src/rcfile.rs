use forksh::{Flow, Shell};
use std::fs;
use std::path::Path;

/// Run every line of a startup file.
///
/// A missing file is silently skipped. Errors are reported per line and do
/// not stop the rest of the file. Returns `Flow::Exit` if the file ran `exit`.
pub(crate) fn load_rc(shell: &mut Shell, path: &Path, label: &str) -> Flow {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Flow::Continue,
    };

    for (line_num, line) in content.lines().enumerate() {
        match shell.execute_line(line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Flow::Exit,
            Err(e) => {
                eprintln!("Warning: {} line {}: {}", label, line_num + 1, e);
                if e.is_fatal() {
                    return Flow::Exit;
                }
            }
        }
    }

    Flow::Continue
}
