use crate::error::RunnerError;
use crate::owner::ProcessOwner;

use super::CommandSpec;

// ============================================================================
// ProcessRunner Trait - run one command, never fail the caller
// ============================================================================

/// Result of a single run.
///
/// Operational failures (missing binary, wait errors) are values rather than
/// `Err`s: a linter that cannot run is something to log and show, not a
/// reason to abort the caller.
#[derive(Debug)]
pub enum RunOutcome {
    /// Decoded, color-stripped output
    Success(String),
    /// The command could not be run to completion
    Failure(RunnerError),
}

impl RunOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Output text; empty for failures.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) => text,
            Self::Failure(_) => "",
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Success(text) => text,
            Self::Failure(_) => String::new(),
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&RunnerError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }
}

/// Trait for process execution.
///
/// Implementations MUST use argv-style APIs only (no shell string
/// evaluation). `run` blocks the calling thread until the child exits; there
/// is no timeout, cancellation goes through the
/// [`ProcessRegistry`](crate::ProcessRegistry).
///
/// # Example
///
/// ```rust
/// use lintrun_runner::{CommandSpec, ProcessOwner, ProcessRunner, RunOutcome};
///
/// struct CannedRunner;
///
/// impl ProcessRunner for CannedRunner {
///     fn run(&self, _cmd: &CommandSpec, _owner: Option<&dyn ProcessOwner>) -> RunOutcome {
///         RunOutcome::Success("app.py:1:1: E265\n".to_string())
///     }
/// }
///
/// let outcome = CannedRunner.run(&CommandSpec::new("flake8"), None);
/// assert!(outcome.text().contains("E265"));
/// ```
pub trait ProcessRunner {
    /// Execute `cmd` on behalf of `owner` and return its selected output.
    fn run(&self, cmd: &CommandSpec, owner: Option<&dyn ProcessOwner>) -> RunOutcome;
}
