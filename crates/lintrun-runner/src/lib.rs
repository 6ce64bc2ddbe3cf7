//! Subprocess execution for lint tools
//!
//! Launches external linters with a resolved environment, optional stdin
//! input and a choice of captured streams, and returns their decoded,
//! color-stripped output. Every running child is tracked in a
//! [`ProcessRegistry`] under the owner that requested it, so a caller can
//! kill everything an owner started.
//!
//! # Security Model
//!
//! All process execution goes through [`CommandSpec`] to ensure argv-style
//! invocation. Arguments are passed as discrete elements, never as a shell
//! string.

pub mod command_spec;
pub mod decode;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod locate;
pub mod native;
pub mod owner;
mod platform;
pub mod process;
pub mod registry;
pub mod types;

pub use command_spec::CommandSpec;
pub use decode::{decode, post_process, strip_ansi};
pub use diagnostics::format_invocation;
pub use environment::{Environment, expand_user, normalize_path_entry, resolve_environment};
pub use error::RunnerError;
pub use lintrun_config::Platform;
pub use locate::{ExecutableSearch, WINDOWS_EXTENSIONS, can_exec, find_executables, which};
pub use native::NativeRunner;
pub use owner::ProcessOwner;
pub use process::{ProcessRunner, RunOutcome};
pub use registry::{ProcessHandle, ProcessRegistry, Termination};
pub use types::{OutputStream, OwnerKey};
