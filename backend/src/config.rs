//! # Application Configuration
//!
//! Settings come from an optional YAML file, then environment overrides.
//!
//! ```yaml
//! data_directory: "/var/lib/education-center"
//! bind_address: "127.0.0.1:3000"
//! log_filter: "info"
//! high_debt_threshold: 250
//! low_attendance_threshold: 75
//! seed_on_first_run: true
//! ```
//!
//! Environment variables:
//! - `EDU_CENTER_CONFIG`: path of the YAML file
//! - `EDU_CENTER_DATA_DIR`: overrides `data_directory`
//! - `EDU_CENTER_BIND`: overrides `bind_address`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "EDU_CENTER_CONFIG";
pub const DATA_DIR_ENV: &str = "EDU_CENTER_DATA_DIR";
pub const BIND_ENV: &str = "EDU_CENTER_BIND";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding one JSON snapshot per collection
    pub data_directory: PathBuf,
    pub bind_address: String,
    /// Used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Balances above this count as high debt in the financial summary
    pub high_debt_threshold: i64,
    /// The dashboard raises an attendance alert when the average rate is below this
    pub low_attendance_threshold: u8,
    /// Fill collections that were never written with the seed dataset
    pub seed_on_first_run: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            bind_address: "127.0.0.1:3000".to_string(),
            log_filter: "info".to_string(),
            high_debt_threshold: 250,
            low_attendance_threshold: 75,
            seed_on_first_run: true,
        }
    }
}

fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("education-center")
}

impl AppConfig {
    /// Load from the file named by `EDU_CENTER_CONFIG` (if any) and apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => {
                debug!("{} not set, using default configuration", CONFIG_ENV);
                Self::default()
            }
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps an environment key to its value
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            debug!("Data directory overridden by {}", DATA_DIR_ENV);
            self.data_directory = PathBuf::from(dir);
        }
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.trim().is_empty()) {
            debug!("Bind address overridden by {}", BIND_ENV);
            self.bind_address = bind;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "bind_address: \"0.0.0.0:8080\"\nhigh_debt_threshold: 500\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.high_debt_threshold, 500);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.low_attendance_threshold, 75);
        assert!(config.seed_on_first_run);
        assert!(config.data_directory.ends_with("education-center"));
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "high_debt_threshold: [not a number]").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
        fs::write(&path, "low_attendance_threshold: 300").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
        assert!(AppConfig::from_file(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::default().with_overrides(|key| match key {
            DATA_DIR_ENV => Some("/tmp/edu".to_string()),
            BIND_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.data_directory, PathBuf::from("/tmp/edu"));
        assert_eq!(config.bind_address, "127.0.0.1:3000");
    }
}
