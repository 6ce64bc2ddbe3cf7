//! lintrun - run external lint tools and collect their output
//!
//! lintrun launches linters the way an editor integration needs them run:
//! with extra per-platform directories prepended to `PATH`, the buffer
//! contents piped to stdin, a chosen set of output streams captured, and the
//! result decoded and stripped of color codes. Every child is tracked under
//! the owner that started it so all of an owner's work can be cancelled.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Lint a file through stdin, capturing stdout only
//! lintrun run --stdin-file src/app.py --stream stdout -- flake8 -
//!
//! # Where would `eslint` be found?
//! lintrun which eslint --all
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lintrun::{CommandSpec, NativeRunner, OutputStream, ProcessRegistry, ProcessRunner, Settings};
//!
//! let settings = Settings::discover().unwrap_or_default();
//! let runner = NativeRunner::from_settings(&settings, Arc::new(ProcessRegistry::new()));
//!
//! let cmd = CommandSpec::new("flake8")
//!     .arg("-")
//!     .input("import os\n")
//!     .output_stream(OutputStream::STDOUT);
//! println!("{}", runner.run(&cmd, None).text());
//! ```

pub mod cli;

pub use lintrun_config::{ConfigError, PathSetting, Platform, PlatformPaths, Settings};
pub use lintrun_runner::{
    CommandSpec, Environment, ExecutableSearch, NativeRunner, OutputStream, OwnerKey,
    ProcessHandle, ProcessOwner, ProcessRegistry, ProcessRunner, RunOutcome, RunnerError,
    Termination, decode, find_executables, resolve_environment, strip_ansi, which,
};
pub use lintrun_utils::ExitCode;
