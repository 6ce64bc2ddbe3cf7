//! Environment resolution for child processes
//!
//! Child processes get the inherited environment with the configured extra
//! search directories for the current platform prepended to `PATH`. The
//! inherited environment is snapshotted, never modified in place.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use lintrun_config::{Platform, PlatformPaths};
use tracing::{Level, info};

/// A complete environment mapping for a child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    /// Snapshot of the current process environment.
    #[must_use]
    pub fn inherited() -> Self {
        Self::from_vars(std::env::vars_os())
    }

    /// Build an environment from explicit variables.
    #[must_use]
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn set(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: impl AsRef<OsStr>) -> Option<OsString> {
        self.vars.remove(key.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The key holding the search path. Windows environments spell it
    /// `Path` as often as `PATH`, so the match is case-insensitive there.
    fn path_key(&self, platform: Platform) -> Option<&OsString> {
        if platform.is_windows() {
            self.vars
                .keys()
                .find(|key| key.to_string_lossy().eq_ignore_ascii_case("PATH"))
        } else {
            self.vars.get_key_value(OsStr::new("PATH")).map(|(k, _)| k)
        }
    }

    /// Value of the search path variable, if set.
    #[must_use]
    pub fn path_var(&self, platform: Platform) -> Option<&OsStr> {
        let key = self.path_key(platform)?;
        self.get(key)
    }

    /// Directories listed in the search path, in order, empty entries skipped.
    #[must_use]
    pub fn path_entries(&self, platform: Platform) -> Vec<PathBuf> {
        self.path_var(platform)
            .map(|value| split_path_var(value, platform))
            .unwrap_or_default()
    }

    /// Variables that are new or changed relative to `base`, as text.
    ///
    /// Used to show only the interesting part of an environment in logs.
    #[must_use]
    pub fn diff(&self, base: &Self) -> BTreeMap<String, String> {
        self.vars
            .iter()
            .filter(|(k, v)| base.vars.get(*k) != Some(*v))
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }
}

/// Build the environment for child processes.
///
/// The configured entries for `platform` are normalised to absolute paths
/// and prepended to `PATH`. With nothing configured the result equals `base`.
#[must_use]
pub fn resolve_environment(
    base: &Environment,
    paths: &PlatformPaths,
    platform: Platform,
) -> Environment {
    let mut env = base.clone();
    let extra: Vec<PathBuf> = paths
        .for_platform(platform)
        .into_iter()
        .map(normalize_path_entry)
        .collect();

    if !extra.is_empty() {
        let separator = platform.path_separator().to_string();
        let mut joined = OsString::new();
        for (i, entry) in extra.iter().enumerate() {
            if i > 0 {
                joined.push(&separator);
            }
            joined.push(entry.as_os_str());
        }

        let key = env
            .path_key(platform)
            .cloned()
            .unwrap_or_else(|| OsString::from("PATH"));
        if let Some(existing) = env.get(&key) {
            joined.push(&separator);
            joined.push(existing);
        }
        env.set(key, joined);
    }

    if let Some(path) = env.path_var(platform) {
        log_path_once(path, platform);
    }

    env
}

/// Expand a leading `~` and make the entry absolute.
#[must_use]
pub fn normalize_path_entry(entry: &str) -> PathBuf {
    let expanded = expand_user(Path::new(entry));
    std::path::absolute(&expanded).unwrap_or(expanded)
}

/// Replace a leading `~` with the user's home directory.
///
/// `~user` forms and paths that are not valid UTF-8 are returned unchanged.
#[must_use]
pub fn expand_user(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
        None => path.to_path_buf(),
    }
}

pub(crate) fn split_path_var(value: &OsStr, platform: Platform) -> Vec<PathBuf> {
    if platform == Platform::current() {
        std::env::split_paths(value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect()
    } else {
        value
            .to_string_lossy()
            .split(platform.path_separator())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect()
    }
}

/// Remembers the last logged search path so repeated resolutions with the
/// same PATH stay quiet.
#[derive(Debug, Default)]
pub(crate) struct PathLogMemo {
    last: Mutex<Option<OsString>>,
}

impl PathLogMemo {
    pub(crate) const fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    /// True when `path` differs from the previously seen value.
    pub(crate) fn first_sighting(&self, path: &OsStr) -> bool {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if last.as_deref() == Some(path) {
            return false;
        }
        *last = Some(path.to_os_string());
        true
    }
}

static PATH_LOG_MEMO: PathLogMemo = PathLogMemo::new();

fn log_path_once(path: &OsStr, platform: Platform) {
    if path.is_empty() || !tracing::enabled!(Level::INFO) {
        return;
    }
    if !PATH_LOG_MEMO.first_sighting(path) {
        return;
    }

    let listing = split_path_var(path, platform)
        .iter()
        .map(|entry| format!("    {}", entry.display()))
        .collect::<Vec<_>>()
        .join("\n");
    info!("PATH:\n{listing}");
}
