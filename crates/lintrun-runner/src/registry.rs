//! Live process registry
//!
//! Tracks which child processes are running on behalf of which owner so an
//! owner going away (a closed buffer, a superseded lint request) can kill
//! everything it started. The whole map sits behind one mutex that is only
//! held for map operations, never while a child runs.
//!
//! Each handle also carries its own small lock around the child's reap
//! state. The waiting side only reaps under that lock and `terminate` only
//! signals under it, so a kill can never land on a pid the OS has already
//! handed to another process.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::RunnerError;
use crate::platform;
use crate::types::OwnerKey;

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// What `terminate` did to a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Signalled,
    /// The process had already exited and been reaped; nothing was sent.
    AlreadyReaped,
}

/// A running child process as seen by the registry.
///
/// Handles compare by a process-wide unique id, not by pid, so a recycled
/// pid never aliases an old entry. Clones share the reap state.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    id: u64,
    pid: u32,
    reaped: Arc<Mutex<bool>>,
}

impl ProcessHandle {
    #[must_use]
    pub fn new(pid: u32) -> Self {
        Self {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            pid,
            reaped: Arc::new(Mutex::new(false)),
        }
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    fn lock_reaped(&self) -> MutexGuard<'_, bool> {
        self.reaped.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn is_reaped(&self) -> bool {
        *self.lock_reaped()
    }

    /// Run a non-blocking wait (`Child::try_wait`) under the reap lock.
    ///
    /// Once `try_wait` reports an exit the handle is marked reaped before the
    /// lock is released.
    pub fn reap_with<T>(
        &self,
        try_wait: impl FnOnce() -> io::Result<Option<T>>,
    ) -> io::Result<Option<T>> {
        let mut reaped = self.lock_reaped();
        let status = try_wait()?;
        if status.is_some() {
            *reaped = true;
        }
        Ok(status)
    }

    /// Kill the process unless it has already been reaped.
    pub fn terminate(&self) -> Result<Termination, RunnerError> {
        let reaped = self.lock_reaped();
        if *reaped {
            return Ok(Termination::AlreadyReaped);
        }
        platform::terminate_process(self.pid)?;
        Ok(Termination::Signalled)
    }
}

impl PartialEq for ProcessHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ProcessHandle {}

impl Hash for ProcessHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Map from owner to its in-flight processes.
///
/// Runs without an owner are filed under the anonymous key (`None`).
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    procs: Mutex<HashMap<Option<OwnerKey>, Vec<ProcessHandle>>>,
}

impl ProcessRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Option<OwnerKey>, Vec<ProcessHandle>>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.procs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, owner: Option<OwnerKey>, handle: ProcessHandle) {
        self.lock().entry(owner).or_default().push(handle);
    }

    /// Remove `handle` from `owner`'s set. Unknown handles are ignored.
    pub fn deregister(&self, owner: Option<OwnerKey>, handle: &ProcessHandle) {
        let mut procs = self.lock();
        if let Some(handles) = procs.get_mut(&owner) {
            if let Some(pos) = handles.iter().position(|h| h == handle) {
                handles.remove(pos);
            }
            if handles.is_empty() {
                procs.remove(&owner);
            }
        }
    }

    /// Snapshot of `owner`'s running processes.
    #[must_use]
    pub fn handles(&self, owner: Option<OwnerKey>) -> Vec<ProcessHandle> {
        self.lock().get(&owner).cloned().unwrap_or_default()
    }

    /// Owners with at least one running process.
    #[must_use]
    pub fn owners(&self) -> Vec<Option<OwnerKey>> {
        self.lock().keys().copied().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Kill every process registered under `owner`, returning how many were
    /// signalled successfully.
    ///
    /// Entries are not removed here; each run deregisters its own handle once
    /// it observes the exit. Handles already reaped are skipped.
    pub fn terminate(&self, owner: Option<OwnerKey>) -> usize {
        let handles = self.handles(owner);
        let mut terminated = 0;

        for handle in handles {
            match handle.terminate() {
                Ok(Termination::Signalled) => {
                    debug!(pid = handle.pid(), owner = ?owner, "terminated process");
                    terminated += 1;
                }
                Ok(Termination::AlreadyReaped) => {
                    debug!(pid = handle.pid(), owner = ?owner, "process already exited");
                }
                Err(e) => warn!(pid = handle.pid(), owner = ?owner, error = %e, "terminate failed"),
            }
        }

        terminated
    }

    /// Forget every entry. Used at shutdown, after terminating what matters.
    pub fn clear(&self) {
        self.lock().clear();
    }
}
