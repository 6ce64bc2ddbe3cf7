//! Foundation utilities shared by the lintrun CLI and library

pub mod exit_codes;
pub mod logging;
pub mod resources;

pub use exit_codes::ExitCode;
pub use resources::{UNKNOWN_VERSION, load_json, package_version};
