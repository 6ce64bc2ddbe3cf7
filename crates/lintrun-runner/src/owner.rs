//! Callbacks from a run back to the context that requested it

use std::path::PathBuf;

use crate::types::OwnerKey;

/// The context a process runs on behalf of, typically an editor buffer.
///
/// The key files the run in the [`ProcessRegistry`](crate::ProcessRegistry);
/// the callbacks surface failures and stderr without turning them into errors.
pub trait ProcessOwner: Send + Sync {
    fn key(&self) -> OwnerKey;

    /// File backing the owner, shown in diagnostics when input is piped.
    fn file_name(&self) -> Option<PathBuf> {
        None
    }

    /// Called once when the command could not be launched.
    fn notify_failure(&self);

    /// Whether stderr should be routed to [`ProcessOwner::on_stderr`] instead
    /// of being appended to stdout when both streams are captured.
    fn handles_stderr(&self) -> bool {
        false
    }

    /// Receives decoded stderr when [`ProcessOwner::handles_stderr`] is true
    /// and stderr is not blank.
    fn on_stderr(&self, _stderr: &str) {}
}
