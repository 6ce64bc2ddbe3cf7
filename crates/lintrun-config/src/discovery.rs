use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::Settings;

/// Environment variable naming a directory that holds `settings.toml`.
pub const LINTRUN_HOME_ENV: &str = "LINTRUN_HOME";

/// Per-project settings directory searched for during discovery.
pub const SETTINGS_DIR: &str = ".lintrun";

/// Settings file name inside [`SETTINGS_DIR`] or `LINTRUN_HOME`.
pub const SETTINGS_FILE: &str = "settings.toml";

impl Settings {
    /// Load and validate settings from a TOML file.
    ///
    /// A missing file yields the built-in defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str::<Self>(&content).with_context(|| {
                format!("Failed to parse TOML settings file: {}", path.display())
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to read settings file {}: {}",
                    path.display(),
                    e
                ));
            }
        };

        settings
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        Ok(settings)
    }

    /// Discover settings from the current working directory.
    pub fn discover() -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir)
    }

    /// Discover settings starting at `start_dir`, honouring `LINTRUN_HOME`.
    pub fn discover_from(start_dir: &Path) -> Result<Self> {
        let home = std::env::var_os(LINTRUN_HOME_ENV).map(PathBuf::from);
        Self::discover_with_home(start_dir, home.as_deref())
    }

    /// Path-driven variant of [`Settings::discover_from`] used by tests to
    /// avoid process-global environment state.
    pub fn discover_with_home(start_dir: &Path, home: Option<&Path>) -> Result<Self> {
        if let Some(home) = home {
            let path = home.join(SETTINGS_FILE);
            if path.exists() {
                return Self::load(&path);
            }
        }

        match Self::discover_settings_file_from(start_dir) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Search upward from `start_dir` for `.lintrun/settings.toml`.
    ///
    /// The search stops at the filesystem root or at the first repository
    /// root (`.git`, `.hg`, `.svn`).
    #[must_use]
    pub fn discover_settings_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = start_dir;

        loop {
            let settings_path = current_dir.join(SETTINGS_DIR).join(SETTINGS_FILE);
            if settings_path.exists() {
                return Some(settings_path);
            }

            if current_dir.join(".git").exists()
                || current_dir.join(".hg").exists()
                || current_dir.join(".svn").exists()
            {
                return None;
            }

            current_dir = current_dir.parent()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Platform;
    use std::fs;
    use tempfile::TempDir;

    fn write_settings(dir: &Path, content: &str) -> PathBuf {
        let settings_dir = dir.join(SETTINGS_DIR);
        fs::create_dir_all(&settings_dir).unwrap();
        let path = settings_dir.join(SETTINGS_FILE);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load(&temp.path().join("nope.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(&path, "[paths\nlinux = ").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse TOML settings file"));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(&path, "[paths]\nlinux = [\"/ok\", \"\"]\n").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("paths.linux"));
    }

    #[test]
    fn test_discover_walks_upward() {
        let temp = TempDir::new().unwrap();
        write_settings(temp.path(), "[paths]\nlinux = \"/opt/lint\"\n");
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let settings = Settings::discover_with_home(&nested, None).unwrap();
        assert_eq!(settings.paths.for_platform(Platform::Linux), vec!["/opt/lint"]);
    }

    #[test]
    fn test_discover_stops_at_repository_root() {
        let temp = TempDir::new().unwrap();
        write_settings(temp.path(), "[paths]\nlinux = \"/outside\"\n");
        let repo = temp.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert!(Settings::discover_settings_file_from(&repo).is_none());
        let settings = Settings::discover_with_home(&repo, None).unwrap();
        assert!(settings.paths.is_empty());
    }

    #[test]
    fn test_home_takes_precedence() {
        let project = TempDir::new().unwrap();
        write_settings(project.path(), "[paths]\nlinux = \"/project\"\n");
        let home = TempDir::new().unwrap();
        fs::write(
            home.path().join(SETTINGS_FILE),
            "[defaults]\nverbose = true\n[paths]\nlinux = \"/home\"\n",
        )
        .unwrap();

        let settings = Settings::discover_with_home(project.path(), Some(home.path())).unwrap();
        assert_eq!(settings.paths.for_platform(Platform::Linux), vec!["/home"]);
        assert!(settings.verbose());
    }
}
