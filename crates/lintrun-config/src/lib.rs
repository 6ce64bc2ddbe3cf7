//! Settings for lintrun
//!
//! Settings come from a TOML file discovered upward from the working
//! directory (`.lintrun/settings.toml`) or pointed at by `LINTRUN_HOME`.
//! Missing files are not an error; built-in defaults apply.

mod discovery;
mod error;
mod model;
mod validation;

pub use discovery::{LINTRUN_HOME_ENV, SETTINGS_DIR, SETTINGS_FILE};
pub use error::ConfigError;
pub use model::{Defaults, PathSetting, Platform, PlatformPaths, Settings};
