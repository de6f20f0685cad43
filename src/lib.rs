//! cf-doctor - Triage a Cloud Foundry space from the command line
//!
//! This crate inspects the apps, routes, and services of the space targeted
//! by the local `cf` CLI and reports anomalies to the operator:
//!
//! - **Resource pressure**: CPU, memory, and disk usage over configurable thresholds
//! - **Scale-down candidates**: instances idling well below their memory quota
//! - **Staging failures**: apps whose last staging failed
//! - **Missing bindings**: running apps without routes, routes and services without apps
//!
//! The login session is borrowed from the `cf` CLI; doctor never logs in by itself.

pub mod api_client;
pub mod application;
pub mod cf_cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod context;
pub mod output;
pub mod platform;
pub mod session;
pub mod triage;

pub use context::CliContext;
pub use output::{OutputFormat, OutputWriter};
pub use platform::{CfConnection, PlatformConnection};
pub use triage::TriageReport;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cf-doctor - Scan a Cloud Foundry space and report anomalies
#[derive(Parser, Debug)]
#[command(
    name = "cf-doctor",
    version,
    about = "Scan your Cloud Foundry space and report anomalies",
    long_about = "cf-doctor is responsible for scanning and reporting about anomalies present in \
                  your cloudfoundry.\n\n\
                  It borrows the session of the installed cf CLI, so log in and target a space \
                  with 'cf login' first.\n\n\
                  Checks: CPU, memory, and disk pressure, scale-down candidates, staging \
                  failures, apps without routes, routes and services without apps."
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the cf CLI binary (default: cf on PATH)
    #[arg(long, global = true, env = "CF_DOCTOR_CF_BINARY")]
    pub cf_binary: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the targeted space and report anomalies
    Doctor(commands::doctor::DoctorArgs),

    /// Configuration management
    #[command(visible_alias = "cfg")]
    Config(commands::config::ConfigArgs),
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
    context: CliContext,
}

impl CliApp {
    /// Create a new CLI application instance
    pub fn new() -> anyhow::Result<Self> {
        let cli = Cli::parse();
        let context = CliContext::new(&cli)?;
        Ok(Self { cli, context })
    }

    /// Run the CLI application
    pub async fn run(self) -> anyhow::Result<i32> {
        let context = self.context;

        let exit_code = match self.cli.command {
            Commands::Doctor(ref args) => commands::doctor::run(&context, &self.cli, args).await,
            Commands::Config(ref args) => commands::config::run(&context, &self.cli, args).await,
        }?;

        Ok(exit_code)
    }
}

/// Exit codes for scripting
pub mod exit_codes {
    /// Success - the run completed
    pub const SUCCESS: i32 = 0;
    /// Triage points found and `report.fail_on_triage` is set
    pub const TRIAGE_POINTS_FOUND: i32 = 1;
    /// Configuration or input error
    pub const CONFIG_ERROR: i32 = 2;
    /// The platform API or the cf CLI failed
    pub const PLATFORM_ERROR: i32 = 3;
    /// The cf CLI is not logged in
    pub const AUTH_REQUIRED: i32 = 5;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = 99;
}
