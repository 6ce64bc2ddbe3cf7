//! Platform specifics: launch flags, permission checks, termination and the
//! system text encoding.

use crate::error::RunnerError;
use std::path::Path;
use std::process::Command;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

/// Apply process creation flags for the host platform.
///
/// On Windows the child gets its own process group and no console window.
/// Elsewhere the command is left untouched.
pub(crate) fn apply_launch_flags(command: &mut Command) {
    #[cfg(windows)]
    {
        windows::apply_launch_flags(command);
    }

    #[cfg(not(windows))]
    {
        let _ = command;
    }
}

/// Whether the current user may execute `path`.
pub(crate) fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        unix::is_executable(path)
    }

    #[cfg(not(unix))]
    {
        // Windows has no execute bit; a regular file is runnable.
        let _ = path;
        true
    }
}

/// Forcefully terminate the process with the given id.
pub(crate) fn terminate_process(pid: u32) -> Result<(), RunnerError> {
    #[cfg(unix)]
    {
        unix::terminate_process(pid)
    }

    #[cfg(windows)]
    {
        windows::terminate_process(pid)
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = pid;
        Ok(())
    }
}

/// Decode bytes using the host's preferred legacy encoding, replacing
/// anything undecodable.
pub(crate) fn decode_system(bytes: &[u8]) -> String {
    #[cfg(unix)]
    {
        unix::decode_locale(bytes)
    }

    #[cfg(windows)]
    {
        windows::decode_ansi_code_page(bytes)
    }

    #[cfg(not(any(unix, windows)))]
    {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
