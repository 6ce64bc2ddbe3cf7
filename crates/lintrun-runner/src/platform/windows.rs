use crate::error::RunnerError;
use std::os::windows::process::CommandExt;
use std::process::Command;

pub(crate) fn apply_launch_flags(command: &mut Command) {
    use windows::Win32::System::Threading::{CREATE_NEW_PROCESS_GROUP, CREATE_NO_WINDOW};

    command.creation_flags(CREATE_NEW_PROCESS_GROUP.0 | CREATE_NO_WINDOW.0);
}

pub(crate) fn terminate_process(pid: u32) -> Result<(), RunnerError> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Threading::{OpenProcess, PROCESS_TERMINATE, TerminateProcess};

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, false, pid).map_err(|e| {
            RunnerError::TerminateFailed {
                pid,
                reason: e.to_string(),
            }
        })?;
        let result = TerminateProcess(handle, 1).map_err(|e| RunnerError::TerminateFailed {
            pid,
            reason: e.to_string(),
        });
        let _ = CloseHandle(handle);
        result
    }
}

/// Decode with the active ANSI code page, the encoding console tools fall
/// back to when they ignore UTF-8 settings.
pub(crate) fn decode_ansi_code_page(bytes: &[u8]) -> String {
    use windows::Win32::Globalization::{CP_ACP, MULTI_BYTE_TO_WIDE_CHAR_FLAGS, MultiByteToWideChar};

    unsafe {
        let len = MultiByteToWideChar(CP_ACP, MULTI_BYTE_TO_WIDE_CHAR_FLAGS(0), bytes, None);
        if len <= 0 {
            return String::from_utf8_lossy(bytes).into_owned();
        }

        let mut wide = vec![0u16; len as usize];
        let written =
            MultiByteToWideChar(CP_ACP, MULTI_BYTE_TO_WIDE_CHAR_FLAGS(0), bytes, Some(&mut wide));
        if written <= 0 {
            return String::from_utf8_lossy(bytes).into_owned();
        }
        wide.truncate(written as usize);
        String::from_utf16_lossy(&wide)
    }
}
