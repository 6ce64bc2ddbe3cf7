//! Human-readable descriptions of command invocations for the log
//!
//! The output mimics what a user would type in a terminal to reproduce the
//! run, including a `cat file |` prefix when the linted text went in on
//! stdin:
//!
//! ```text
//! Running ...
//!
//!   /home/me/project  (working dir)
//!   $ cat src/app.py | flake8 --format default -
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::owner::ProcessOwner;

#[cfg(windows)]
const PROMPT: &str = ">";
#[cfg(not(windows))]
const PROMPT: &str = "$";

fn pipe_prefix(source: &str) -> String {
    if cfg!(windows) {
        format!(" type {source} |")
    } else {
        format!(" cat {source} |")
    }
}

/// Quote `cmd` the way the host shell would need it typed.
#[cfg(not(windows))]
fn render_command(cmd: &[String]) -> String {
    shell_words::join(cmd)
}

/// cmd.exe has no single quotes; arguments with blanks go in double quotes.
#[cfg(windows)]
fn render_command(cmd: &[String]) -> String {
    cmd.iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains([' ', '\t']) {
                format!("\"{arg}\"")
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Describe a command invocation for troubleshooting.
///
/// `env_diff` holds the variables that differ from the inherited
/// environment; it is appended as a pretty-printed block when present.
#[must_use]
pub fn format_invocation(
    headline: &str,
    cmd: &[String],
    uses_stdin: bool,
    cwd: Option<&Path>,
    owner: Option<&dyn ProcessOwner>,
    env_diff: Option<&BTreeMap<String, String>>,
) -> String {
    let real_cwd = cwd.map(Path::to_path_buf).unwrap_or_else(current_dir);

    let pipe = if uses_stdin {
        pipe_prefix(&stdin_source(cwd, owner))
    } else {
        String::new()
    };

    let mut message = format!(
        "{headline}\n\n  {cwd}  (working dir)\n  {PROMPT}{pipe} {cmd}\n",
        cwd = real_cwd.display(),
        cmd = render_command(cmd),
    );

    if let Some(env) = env_diff.filter(|env| !env.is_empty()) {
        message.push_str(&format_env(env));
    }

    message
}

fn current_dir() -> PathBuf {
    std::env::current_dir()
        .and_then(|dir| dir.canonicalize())
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Name of whatever was piped to stdin.
fn stdin_source(cwd: Option<&Path>, owner: Option<&dyn ProcessOwner>) -> String {
    let Some(owner) = owner else {
        return "<?>".to_string();
    };

    match (owner.file_name(), cwd) {
        (Some(file), Some(cwd)) => pathdiff::diff_paths(&file, cwd)
            .map_or_else(|| file.display().to_string(), |rel| rel.display().to_string()),
        (Some(file), None) => file.display().to_string(),
        (None, _) => format!("<buffer {}>", owner.key()),
    }
}

fn format_env(env: &BTreeMap<String, String>) -> String {
    let pretty = serde_json::to_string_pretty(env).unwrap_or_else(|_| format!("{env:?}"));
    let indented = pretty
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!("\n  Modified environment:\n\n{indented}\n")
}
