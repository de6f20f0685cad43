//! Configuration - triage thresholds and `cf` integration settings
//!
//! Configuration is read from a TOML file. The first existing file in
//! [`config_search_paths`] wins, unless `--config` names one explicitly; when none exists the built-in defaults are
//! used, which reproduce the stock doctor rules.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CF_BINARY, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS, LOCAL_CONFIG_FILES,
};

/// Top-level doctor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rule thresholds
    pub thresholds: Thresholds,

    /// How to reach the platform
    pub cf: CfSettings,

    pub report: ReportSettings,
}

/// Report behaviour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Exit non-zero when any triage point is found
    pub fail_on_triage: bool,
}

/// Thresholds used by the triage rules
///
/// Ratios are fractions of the instance quota, percentages are CPU percent
/// of one core as reported by `cf app`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// CPU usage above this percentage is flagged
    pub cpu_percent: f64,

    /// Disk usage above this fraction of the disk quota is flagged
    pub disk_ratio: f64,

    /// Memory usage above this fraction of the memory quota is flagged
    pub memory_high_ratio: f64,

    /// Memory usage below this fraction of the memory quota suggests scaling down
    pub memory_low_ratio: f64,

    /// CPU usage below this percentage counts as idle for multi-instance apps
    pub idle_cpu_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu_percent: 85.0,
            disk_ratio: 0.80,
            memory_high_ratio: 0.80,
            memory_low_ratio: 0.15,
            idle_cpu_percent: 10.0,
        }
    }
}

/// Settings for talking to Cloud Foundry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfSettings {
    /// Path or name of the `cf` binary
    pub binary: String,

    /// Overrides `CF_HOME` when locating the CLI session
    pub home: Option<PathBuf>,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// HTTP connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for CfSettings {
    fn default() -> Self {
        Self {
            binary: DEFAULT_CF_BINARY.to_string(),
            home: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration from {:?}", path))?;
        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}

/// Configuration file search paths, in priority order
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = LOCAL_CONFIG_FILES.iter().map(PathBuf::from).collect();
    paths.push(user_config_path());

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".cf-doctor").join("config.toml"));
    }

    paths
}

/// First search path that exists
pub fn find_config_file() -> Option<PathBuf> {
    config_search_paths().into_iter().find(|p| p.exists())
}

/// Per-user configuration file path
pub fn user_config_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("org", "cloudfoundry", "cf-doctor") {
        dirs.config_dir().join("config.toml")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".cf-doctor").join("config.toml")
    } else {
        PathBuf::from(LOCAL_CONFIG_FILES[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds_match_stock_rules() {
        let t = Thresholds::default();
        assert_eq!(t.cpu_percent, 85.0);
        assert_eq!(t.disk_ratio, 0.80);
        assert_eq!(t.memory_high_ratio, 0.80);
        assert_eq!(t.memory_low_ratio, 0.15);
        assert_eq!(t.idle_cpu_percent, 10.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[thresholds]
cpu_percent = 70.0

[cf]
binary = "/usr/local/bin/cf8"
"#,
        )
        .unwrap();

        assert_eq!(config.thresholds.cpu_percent, 70.0);
        assert_eq!(config.thresholds.memory_low_ratio, 0.15);
        assert_eq!(config.cf.binary, "/usr/local/bin/cf8");
        assert_eq!(config.cf.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.cf.home.is_none());
        assert!(!config.report.fail_on_triage);
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cf-doctor.toml");
        std::fs::write(&path, "thresholds = 12").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration"));
    }

    #[test]
    fn test_search_paths_start_with_local_files() {
        let paths = config_search_paths();
        assert_eq!(paths[0], PathBuf::from(".cf-doctor.toml"));
        assert_eq!(paths[1], PathBuf::from("cf-doctor.toml"));
        assert!(paths.len() >= 3);
    }
}
