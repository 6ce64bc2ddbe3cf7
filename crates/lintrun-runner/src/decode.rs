//! Output post-processing: byte decoding and ANSI color stripping
//!
//! Lint tools write whatever encoding their platform defaults to and often
//! colorize output even when piped, so captured bytes go through [`decode`]
//! and [`strip_ansi`] before anyone parses them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::platform;

static ANSI_COLOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());

/// Decode tool output.
///
/// UTF-8 is tried first. Invalid UTF-8 is decoded with the system's preferred
/// encoding, substituting replacement characters instead of failing; some
/// compilers emit a legacy code page no matter what input encoding they are
/// told to use.
#[must_use]
pub fn decode(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => platform::decode_system(bytes),
    }
}

/// Remove SGR (color/style) escape sequences.
///
/// Removal repeats until nothing matches, since deleting one sequence can
/// splice the text around it into a new one (`"\x1b[\x1b[0mm"`).
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    let mut stripped = ANSI_COLOR_RE.replace_all(text, "").into_owned();
    while ANSI_COLOR_RE.is_match(&stripped) {
        stripped = ANSI_COLOR_RE.replace_all(&stripped, "").into_owned();
    }
    stripped
}

/// [`decode`] followed by [`strip_ansi`].
#[must_use]
pub fn post_process(bytes: &[u8]) -> String {
    strip_ansi(&decode(bytes))
}
