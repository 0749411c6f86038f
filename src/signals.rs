//! Signal handling for forksh
//!
//! - SIGINT: ignored by the interpreter; foreground children get the default
//!   disposition back so the user can interrupt them.
//! - SIGTSTP: toggles foreground-only mode. The handler only flips an
//!   atomic flag and writes a fixed message with `write(2)`.

use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nix::errno::Errno;
use nix::sys::signal::{signal, SigHandler, Signal};
use signal_hook::SigId;
use thiserror::Error;

/// Printed when foreground-only mode is switched on
pub const ENTER_FOREGROUND_ONLY: &[u8] = b"\nEntering foreground-only mode (& is now ignored)\n";

/// Printed when foreground-only mode is switched off
pub const EXIT_FOREGROUND_ONLY: &[u8] = b"\nExiting foreground-only mode\n";

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("failed to ignore SIGINT: {0}")]
    Ignore(Errno),
    #[error("failed to install SIGTSTP handler: {0}")]
    Register(#[from] std::io::Error),
}

/// Flip foreground-only mode and announce the new mode on `fd`.
///
/// Safe to call from a signal handler: no allocation, no locks, no
/// formatting.
pub fn toggle_foreground_only(flag: &AtomicBool, fd: RawFd) {
    let was_on = flag.fetch_xor(true, Ordering::SeqCst);
    let message = if was_on {
        EXIT_FOREGROUND_ONLY
    } else {
        ENTER_FOREGROUND_ONLY
    };
    // Nothing useful can be done about a failed write here
    unsafe {
        libc::write(fd, message.as_ptr().cast(), message.len());
    }
}

/// Install the interpreter's dispositions.
///
/// The returned id can be passed to `signal_hook::low_level::unregister`.
pub fn install(flag: Arc<AtomicBool>) -> Result<SigId, SignalError> {
    unsafe {
        signal(Signal::SIGINT, SigHandler::SigIgn).map_err(SignalError::Ignore)?;
    }

    let id = unsafe {
        signal_hook::low_level::register(signal_hook::consts::SIGTSTP, move || {
            toggle_foreground_only(&flag, libc::STDOUT_FILENO);
        })?
    };

    Ok(id)
}

/// Dispositions for a freshly forked child, before exec.
///
/// SIGTSTP is ignored so that the mode-toggle keystroke never stops a child.
/// SIGINT goes back to default when `interruptible` is set and otherwise
/// stays ignored, as inherited from the interpreter.
pub fn reset_for_child(interruptible: bool) {
    unsafe {
        let _ = signal(Signal::SIGTSTP, SigHandler::SigIgn);
        if interruptible {
            let _ = signal(Signal::SIGINT, SigHandler::SigDfl);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Seek, SeekFrom};
    use std::os::unix::io::AsRawFd;

    fn written(file: &mut std::fs::File) -> Vec<u8> {
        let mut buf = Vec::new();
        file.seek(SeekFrom::Start(0)).unwrap();
        file.read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn toggle_enters_then_exits() {
        let flag = AtomicBool::new(false);
        let mut file = tempfile::tempfile().unwrap();

        toggle_foreground_only(&flag, file.as_raw_fd());
        assert!(flag.load(Ordering::SeqCst));
        assert_eq!(written(&mut file), ENTER_FOREGROUND_ONLY);

        toggle_foreground_only(&flag, file.as_raw_fd());
        assert!(!flag.load(Ordering::SeqCst));
        let mut expected = ENTER_FOREGROUND_ONLY.to_vec();
        expected.extend_from_slice(EXIT_FOREGROUND_ONLY);
        assert_eq!(written(&mut file), expected);
    }

    #[test]
    fn messages_are_fixed_literals() {
        assert!(ENTER_FOREGROUND_ONLY.starts_with(b"\nEntering foreground-only mode"));
        assert!(EXIT_FOREGROUND_ONLY.ends_with(b"mode\n"));
    }
}
