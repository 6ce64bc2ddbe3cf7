use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Platform identifiers used to key per-platform settings.
///
/// The string forms match the identifiers editors report (`windows`, `osx`,
/// `linux`), so settings files written for an editor plugin load unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Osx,
    Linux,
}

impl Platform {
    /// The platform this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Osx
        } else {
            Self::Linux
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Osx => "osx",
            Self::Linux => "linux",
        }
    }

    /// Separator between entries of a PATH-like variable.
    #[must_use]
    pub const fn path_separator(&self) -> char {
        match self {
            Self::Windows => ';',
            Self::Osx | Self::Linux => ':',
        }
    }

    #[must_use]
    pub const fn is_windows(&self) -> bool {
        matches!(self, Self::Windows)
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "windows" => Ok(Self::Windows),
            "osx" => Ok(Self::Osx),
            "linux" => Ok(Self::Linux),
            other => Err(format!(
                "unknown platform '{other}' (expected windows, osx or linux)"
            )),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `paths` entry: either a single directory or a list of directories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PathSetting {
    One(String),
    Many(Vec<String>),
}

impl PathSetting {
    /// Entries in configured order.
    #[must_use]
    pub fn entries(&self) -> Vec<&str> {
        match self {
            Self::One(path) => vec![path.as_str()],
            Self::Many(paths) => paths.iter().map(String::as_str).collect(),
        }
    }
}

/// Extra search directories keyed by platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PlatformPaths(BTreeMap<String, PathSetting>);

impl PlatformPaths {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful for programmatic configuration.
    #[must_use]
    pub fn with(mut self, platform: Platform, setting: PathSetting) -> Self {
        self.0.insert(platform.as_str().to_string(), setting);
        self
    }

    /// Configured entries for `platform`, empty when nothing is configured.
    #[must_use]
    pub fn for_platform(&self, platform: Platform) -> Vec<&str> {
        self.0
            .get(platform.as_str())
            .map(PathSetting::entries)
            .unwrap_or_default()
    }

    /// Raw entries as written, including keys that name no known platform.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathSetting)> {
        self.0.iter().map(|(key, setting)| (key.as_str(), setting))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// General behaviour switches from the `[defaults]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    /// Verbose logging
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Settings consumed by the runner and the CLI.
///
/// ```toml
/// [defaults]
/// verbose = false
///
/// [paths]
/// linux = ["~/.local/bin", "/opt/linters/bin"]
/// osx = "/usr/local/bin"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub paths: PlatformPaths,
}

impl Settings {
    /// Whether verbose logging was requested, defaulting to off.
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.defaults.verbose.unwrap_or(false)
    }
}
