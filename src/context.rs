//! CLI Context - Lightweight service context for CLI operations
//!
//! Holds the loaded configuration and the output writer, and builds the
//! platform connection on demand so commands that never touch Cloud Foundry
//! (such as `config`) do not need a `cf` session.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::Cli;
use crate::cf_cli::CfCli;
use crate::config::{Config, find_config_file};
use crate::output::OutputWriter;
use crate::platform::CfConnection;
use crate::session::CfSession;

/// Lightweight context for CLI operations
pub struct CliContext {
    /// Application configuration
    pub config: Arc<Config>,

    /// Output writer configured based on CLI flags
    pub output: OutputWriter,

    /// Configuration file that was loaded, if any
    pub config_file: Option<PathBuf>,
}

impl CliContext {
    /// Create a new CLI context from parsed CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let config_file = match &cli.config {
            Some(path) => Some(path.clone()),
            None => find_config_file(),
        };

        let mut config = match &config_file {
            Some(path) => Config::from_file(path)?,
            None => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        };

        if let Some(binary) = &cli.cf_binary {
            config.cf.binary = binary.clone();
        }

        let output = OutputWriter::new(cli.format, cli.quiet, cli.verbose);

        Ok(Self {
            config: Arc::new(config),
            output,
            config_file,
        })
    }

    /// Runner for the configured `cf` binary
    pub fn cf_cli(&self) -> CfCli {
        CfCli::new(self.config.cf.binary.clone(), self.config.cf.home.clone())
    }

    /// Borrow the `cf` CLI session and connect to its target
    pub async fn connect(&self) -> Result<CfConnection> {
        let session = CfSession::load(self.config.cf.home.as_deref())?;
        tracing::debug!(
            "cf session: target={:?} org={:?} space={:?}",
            session.target,
            session.organization.name,
            session.space.name
        );

        CfConnection::connect(
            session,
            self.cf_cli(),
            self.config.cf.timeout_secs,
            self.config.cf.connect_timeout_secs,
        )
        .await
    }
}
