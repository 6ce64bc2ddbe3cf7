use crate::error::RunnerError;
use std::path::Path;

pub(crate) fn is_executable(path: &Path) -> bool {
    use nix::unistd::{AccessFlags, access};

    access(path, AccessFlags::X_OK).is_ok()
}

pub(crate) fn terminate_process(pid: u32) -> Result<(), RunnerError> {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).map_err(|_| RunnerError::TerminateFailed {
        pid,
        reason: "pid out of range".to_string(),
    })?;

    kill(Pid::from_raw(raw), Signal::SIGKILL).map_err(|errno| RunnerError::TerminateFailed {
        pid,
        reason: errno.desc().to_string(),
    })
}

/// Legacy single-byte locales decode byte-for-byte; everything else is
/// treated as UTF-8 with replacement characters.
pub(crate) fn decode_locale(bytes: &[u8]) -> String {
    if locale_is_latin1() {
        bytes.iter().map(|&b| char::from(b)).collect()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

fn locale_is_latin1() -> bool {
    let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty());

    locale.is_some_and(|value| is_latin1_charset(&value))
}

fn is_latin1_charset(locale: &str) -> bool {
    let Some((_, charset)) = locale.split_once('.') else {
        return false;
    };
    let charset = charset.split('@').next().unwrap_or_default();
    let normalized: String = charset
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    matches!(normalized.as_str(), "iso88591" | "iso885915" | "latin1" | "cp1252")
}
