//! Executable lookup along a search path

use std::path::{Path, PathBuf};

use lintrun_config::Platform;

use crate::environment::{Environment, expand_user};

/// Extensions tried, in order, for extension-less names on Windows.
pub const WINDOWS_EXTENSIONS: [&str; 3] = [".exe", ".cmd", ".bat"];

/// A lazy search for an executable across a list of directories.
///
/// Nothing touches the filesystem until iteration, and every call to
/// [`ExecutableSearch::iter`] scans again, so a search can be kept around and
/// re-run after tools are installed.
#[derive(Debug, Clone)]
pub struct ExecutableSearch {
    name: String,
    dirs: Vec<PathBuf>,
    platform: Platform,
}

impl ExecutableSearch {
    #[must_use]
    pub fn new(name: impl Into<String>, dirs: Vec<PathBuf>, platform: Platform) -> Self {
        Self {
            name: name.into(),
            dirs,
            platform,
        }
    }

    /// Every matching executable, in search path order.
    pub fn iter(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.dirs
            .iter()
            .flat_map(move |dir| self.candidates(dir))
            .filter(|candidate| can_exec(candidate))
    }

    /// First match, if any.
    #[must_use]
    pub fn first(&self) -> Option<PathBuf> {
        self.iter().next()
    }

    fn candidates(&self, dir: &Path) -> Vec<PathBuf> {
        let path = expand_user(dir).join(&self.name);

        if self.platform.is_windows() && path.extension().is_none() {
            WINDOWS_EXTENSIONS
                .iter()
                .map(|ext| {
                    let mut with_ext = path.clone().into_os_string();
                    with_ext.push(ext);
                    PathBuf::from(with_ext)
                })
                .collect()
        } else {
            vec![path]
        }
    }
}

impl<'a> IntoIterator for &'a ExecutableSearch {
    type Item = PathBuf;
    type IntoIter = Box<dyn Iterator<Item = PathBuf> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Search `env`'s PATH for `name`.
#[must_use]
pub fn find_executables(name: &str, env: &Environment, platform: Platform) -> ExecutableSearch {
    ExecutableSearch::new(name, env.path_entries(platform), platform)
}

/// Full path of the first `name` on `env`'s PATH.
#[must_use]
pub fn which(name: &str, env: &Environment, platform: Platform) -> Option<PathBuf> {
    find_executables(name, env, platform).first()
}

/// Whether `path` is a regular file the current user may execute.
#[must_use]
pub fn can_exec(path: &Path) -> bool {
    let is_file = std::fs::metadata(path).is_ok_and(|meta| meta.is_file());
    is_file && crate::platform::is_executable(path)
}
