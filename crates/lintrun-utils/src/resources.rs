//! Bundled JSON resources and package metadata

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

/// Metadata file read by [`package_version`].
pub const PACKAGE_METADATA_FILE: &str = "package-metadata.json";

/// Version reported when the metadata cannot be read.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Load and parse the JSON file at `base_dir/segments...`.
pub fn load_json(base_dir: &Path, segments: &[&str]) -> Result<Value> {
    let path: PathBuf = segments
        .iter()
        .fold(base_dir.to_path_buf(), |path, segment| path.join(segment));

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read resource: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON resource: {}", path.display()))
}

/// The `version` field of `package-metadata.json` in `base_dir`, or
/// [`UNKNOWN_VERSION`] when the file is missing, malformed or has no version.
#[must_use]
pub fn package_version(base_dir: &Path) -> String {
    match load_json(base_dir, &[PACKAGE_METADATA_FILE]) {
        Ok(metadata) => metadata
            .get("version")
            .and_then(Value::as_str)
            .map_or_else(|| UNKNOWN_VERSION.to_string(), str::to_string),
        Err(e) => {
            tracing::debug!(error = %e, "package metadata unavailable");
            UNKNOWN_VERSION.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_json_nested_segments() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("linters")).unwrap();
        std::fs::write(
            dir.path().join("linters").join("flake8.json"),
            r#"{"cmd": ["flake8", "-"], "stdin": true}"#,
        )
        .unwrap();

        let value = load_json(dir.path(), &["linters", "flake8.json"]).unwrap();
        assert_eq!(value["cmd"][0], "flake8");
        assert_eq!(value["stdin"], true);
    }

    #[test]
    fn test_load_json_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_json(dir.path(), &["nope.json"]).unwrap_err();
        assert!(err.to_string().contains("Failed to read resource"));
    }

    #[test]
    fn test_load_json_malformed() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let err = load_json(dir.path(), &["bad.json"]).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON resource"));
    }

    #[test]
    fn test_package_version() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(PACKAGE_METADATA_FILE),
            r#"{"name": "lintrun", "version": "4.2.1"}"#,
        )
        .unwrap();
        assert_eq!(package_version(dir.path()), "4.2.1");
    }

    #[test]
    fn test_package_version_unknown() {
        let dir = TempDir::new().unwrap();
        assert_eq!(package_version(dir.path()), UNKNOWN_VERSION);

        std::fs::write(dir.path().join(PACKAGE_METADATA_FILE), r#"{"version": 3}"#).unwrap();
        assert_eq!(package_version(dir.path()), UNKNOWN_VERSION);

        std::fs::write(dir.path().join(PACKAGE_METADATA_FILE), "garbage").unwrap();
        assert_eq!(package_version(dir.path()), UNKNOWN_VERSION);
    }
}
