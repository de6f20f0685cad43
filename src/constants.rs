//! Shared constants for the CLI application
//!
//! This module contains global constants used across the application to ensure
//! consistency and avoid magic strings.

/// Default name of the Cloud Foundry CLI binary
pub const DEFAULT_CF_BINARY: &str = "cf";

/// Environment variable that relocates the `cf` CLI home directory
pub const CF_HOME_ENV: &str = "CF_HOME";

/// Directory (under the cf home) that holds the CLI session
pub const CF_CONFIG_DIR: &str = ".cf";

/// Session file written by the `cf` CLI on login and target
pub const CF_CONFIG_FILE: &str = "config.json";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default connection timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// User agent string
pub const USER_AGENT: &str = concat!("cf-doctor/", env!("CARGO_PKG_VERSION"));

/// Configuration file names searched in the working directory
pub const LOCAL_CONFIG_FILES: [&str; 2] = [".cf-doctor.toml", "cf-doctor.toml"];
