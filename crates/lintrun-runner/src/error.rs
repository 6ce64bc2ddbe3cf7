//! Error types for runner module

use thiserror::Error;

/// Operational failures of a process run.
///
/// These never escape [`ProcessRunner::run`](crate::ProcessRunner::run) as an
/// `Err`; they are carried inside [`RunOutcome::Failure`](crate::RunOutcome).
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to launch '{program}': {reason}")]
    LaunchFailed { program: String, reason: String },

    #[error("Failed to collect process output: {reason}")]
    CollectFailed { reason: String },

    #[error("Failed to terminate process {pid}: {reason}")]
    TerminateFailed { pid: u32, reason: String },
}
