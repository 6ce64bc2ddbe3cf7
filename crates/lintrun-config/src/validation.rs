use crate::error::ConfigError;

use super::{Platform, Settings};

impl Settings {
    /// Validate settings values
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, setting) in self.paths.iter() {
            if let Err(reason) = key.parse::<Platform>() {
                return Err(ConfigError::InvalidValue {
                    key: format!("paths.{key}"),
                    value: reason,
                });
            }

            if setting.entries().iter().any(|entry| entry.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: format!("paths.{key}"),
                    value: "path entries must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}
