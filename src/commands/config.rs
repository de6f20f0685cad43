//! Config Command - Configuration management
//!
//! View the effective configuration and create a starter file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::Cli;
use crate::config::{Config, config_search_paths, user_config_path};
use crate::constants::LOCAL_CONFIG_FILES;
use crate::context::CliContext;
use crate::exit_codes;
use crate::output::OutputFormat;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Show configuration file search paths
    Path,
    /// Get a configuration value
    Get(GetArgs),
    /// Initialize a new configuration file
    Init(InitArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key to retrieve (e.g., "thresholds.cpu_percent")
    pub key: String,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Create config in the current directory instead of the user config
    #[arg(long)]
    pub local: bool,

    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

/// Configuration info for JSON output
#[derive(Debug, Serialize)]
pub struct ConfigInfo<'a> {
    pub config_file: Option<&'a PathBuf>,
    pub values: &'a Config,
}

/// Run the config command
pub async fn run(ctx: &CliContext, cli: &Cli, args: &ConfigArgs) -> Result<i32> {
    match &args.command {
        ConfigCommand::Show => show_config(ctx, cli),
        ConfigCommand::Path => show_path(ctx, cli),
        ConfigCommand::Get(get_args) => get_config(ctx, cli, get_args),
        ConfigCommand::Init(init_args) => init_config(ctx, cli, init_args),
    }
}

/// Show current configuration
fn show_config(ctx: &CliContext, _cli: &Cli) -> Result<i32> {
    match ctx.output.format() {
        OutputFormat::Json => {
            ctx.output.json(&ConfigInfo {
                config_file: ctx.config_file.as_ref(),
                values: &ctx.config,
            })?;
        }
        OutputFormat::Table | OutputFormat::Plain => {
            ctx.output.header("Current Configuration");

            match &ctx.config_file {
                Some(path) => ctx.output.print(&format!("Loaded from: {:?}", path)),
                None => ctx.output.print("Loaded from: built-in defaults"),
            }

            let t = &ctx.config.thresholds;
            ctx.output.print("\n[thresholds]");
            ctx.output.print(&format!("  cpu_percent: {}", t.cpu_percent));
            ctx.output.print(&format!("  disk_ratio: {}", t.disk_ratio));
            ctx.output
                .print(&format!("  memory_high_ratio: {}", t.memory_high_ratio));
            ctx.output
                .print(&format!("  memory_low_ratio: {}", t.memory_low_ratio));
            ctx.output
                .print(&format!("  idle_cpu_percent: {}", t.idle_cpu_percent));

            let cf = &ctx.config.cf;
            ctx.output.print("\n[cf]");
            ctx.output.print(&format!("  binary: {}", cf.binary));
            ctx.output.print(&format!(
                "  home: {}",
                cf.home
                    .as_ref()
                    .map(|h| h.display().to_string())
                    .unwrap_or_else(|| "(CF_HOME or home directory)".to_string())
            ));
            ctx.output
                .print(&format!("  timeout_secs: {}", cf.timeout_secs));
            ctx.output.print(&format!(
                "  connect_timeout_secs: {}",
                cf.connect_timeout_secs
            ));

            ctx.output.print("\n[report]");
            ctx.output.print(&format!(
                "  fail_on_triage: {}",
                ctx.config.report.fail_on_triage
            ));
        }
    }

    Ok(exit_codes::SUCCESS)
}

/// Show configuration file search paths
fn show_path(ctx: &CliContext, _cli: &Cli) -> Result<i32> {
    ctx.output.header("Configuration File Locations");

    ctx.output.print("\nSearch order (first found is used):");
    for (i, path) in config_search_paths().iter().enumerate() {
        let marker = if path.exists() { "✓" } else { " " };
        ctx.output
            .print(&format!("  {} {}. {:?}", marker, i + 1, path));
    }

    ctx.output.print("\nEnvironment variables:");
    ctx.output
        .print("  CF_HOME - Directory holding the cf CLI session (.cf/config.json)");
    ctx.output
        .print("  CF_DOCTOR_CF_BINARY - Path to the cf binary");
    ctx.output
        .print("  RUST_LOG - Log filter, e.g. cf_doctor=debug");

    Ok(exit_codes::SUCCESS)
}

/// Get a configuration value
fn get_config(ctx: &CliContext, _cli: &Cli, args: &GetArgs) -> Result<i32> {
    let config_value = serde_json::to_value(&*ctx.config)?;

    let mut current = &config_value;
    for part in args.key.split('.') {
        match current.get(part) {
            Some(v) => current = v,
            None => {
                ctx.output
                    .error(&format!("Configuration key not found: {}", args.key));
                return Ok(exit_codes::CONFIG_ERROR);
            }
        }
    }

    match ctx.output.format() {
        OutputFormat::Json => {
            ctx.output.json(current)?;
        }
        _ => {
            ctx.output.print(&format!("{} = {}", args.key, current));
        }
    }

    Ok(exit_codes::SUCCESS)
}

/// Initialize a new configuration file
fn init_config(ctx: &CliContext, _cli: &Cli, args: &InitArgs) -> Result<i32> {
    let config_path = if args.local {
        PathBuf::from(LOCAL_CONFIG_FILES[1])
    } else {
        user_config_path()
    };

    if config_path.exists() && !args.force {
        ctx.output
            .error(&format!("Config file already exists: {:?}", config_path));
        ctx.output.info("Use --force to overwrite");
        return Ok(exit_codes::CONFIG_ERROR);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&config_path, default_config_file()?)?;

    ctx.output
        .success(&format!("Created config file: {:?}", config_path));
    ctx.output
        .info("Edit this file to tune the triage thresholds");

    Ok(exit_codes::SUCCESS)
}

/// Starter config: the defaults, rendered as TOML under a short preamble
fn default_config_file() -> Result<String> {
    let body = toml::to_string_pretty(&Config::default())?;
    Ok(format!(
        "# cf-doctor configuration\n\
         # Ratios are fractions of the instance quota; CPU values are percent of one core.\n\n{}",
        body
    ))
}
