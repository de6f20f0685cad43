//! CF Session - Reads the login state kept by the `cf` CLI
//!
//! The `cf` CLI stores its target, tokens, and targeted org/space in
//! `$CF_HOME/.cf/config.json` (`~/.cf/config.json` when `CF_HOME` is unset).
//! Doctor never writes this file; it only borrows the session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::constants::{CF_CONFIG_DIR, CF_CONFIG_FILE, CF_HOME_ENV};

/// Name and GUID of a targeted org or space
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetFields {
    #[serde(rename = "GUID", default)]
    pub guid: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}

impl TargetFields {
    pub fn is_set(&self) -> bool {
        !self.guid.is_empty()
    }
}

/// Subset of the `cf` CLI `config.json` that doctor needs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CfSession {
    /// Cloud Controller API endpoint, e.g. `https://api.example.com`
    #[serde(rename = "Target", default)]
    pub target: String,

    /// `bearer ...` token from the last login or refresh
    #[serde(rename = "AccessToken", default)]
    pub access_token: String,

    #[serde(rename = "SSLDisabled", default)]
    pub ssl_disabled: bool,

    #[serde(rename = "OrganizationFields", default)]
    pub organization: TargetFields,

    #[serde(rename = "SpaceFields", default)]
    pub space: TargetFields,
}

impl CfSession {
    /// Load the session from the default location
    ///
    /// A missing file is not an error: it means the CLI never logged in, so an
    /// empty session is returned.
    pub fn load(home_override: Option<&Path>) -> Result<Self> {
        let path = session_file_path(home_override)?;
        if !path.exists() {
            tracing::debug!("No cf session file at {:?}", path);
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Load the session from an explicit `config.json`
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cf session from {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cf session from {:?}", path))
    }

    pub fn is_logged_in(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    pub fn has_organization(&self) -> bool {
        self.organization.is_set()
    }

    pub fn has_space(&self) -> bool {
        self.space.is_set()
    }
}

/// Resolve the `config.json` location: explicit override, then `CF_HOME`, then home dir
pub fn session_file_path(home_override: Option<&Path>) -> Result<PathBuf> {
    let home = match home_override {
        Some(home) => home.to_path_buf(),
        None => match std::env::var_os(CF_HOME_ENV) {
            Some(home) if !home.is_empty() => PathBuf::from(home),
            _ => dirs::home_dir().ok_or_else(|| anyhow!("Failed to determine home directory"))?,
        },
    };

    Ok(home.join(CF_CONFIG_DIR).join(CF_CONFIG_FILE))
}
