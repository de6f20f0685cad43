//! CF CLI Runner - Invokes the installed `cf` binary
//!
//! Doctor relies on the host `cf` CLI for everything tied to the login
//! session: a fresh bearer token (`cf oauth-token`) and the tabular listings
//! of routes and services. Output is captured without a terminal and split
//! into lines.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result, anyhow};
use tokio::process::Command;

use crate::constants::CF_HOME_ENV;

/// Runs `cf` subcommands and captures their output
#[derive(Debug, Clone)]
pub struct CfCli {
    binary: String,
    home: Option<PathBuf>,
}

impl CfCli {
    pub fn new(binary: impl Into<String>, home: Option<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            home,
        }
    }

    /// Run a `cf` subcommand and return its stdout as lines
    ///
    /// A non-zero exit status is an error carrying the CLI's own message,
    /// which `cf` prints to stdout after `FAILED`.
    pub async fn run(&self, args: &[&str]) -> Result<Vec<String>> {
        let command_line = format!("{} {}", self.binary, args.join(" "));
        tracing::debug!("Running `{}`", command_line);

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .env("CF_COLOR", "false")
            .env("CF_TRACE", "false")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(home) = &self.home {
            cmd.env(CF_HOME_ENV, home);
        }

        let output = cmd
            .output()
            .await
            .with_context(|| format!("Failed to execute `{}`", command_line))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "`{}` exited with {}: {}",
                command_line,
                output.status,
                failure_message(&stdout, &stderr)
            ));
        }

        Ok(stdout.lines().map(str::to_string).collect())
    }

    /// Ask the CLI for a current bearer token, refreshing it if needed
    pub async fn oauth_token(&self) -> Result<String> {
        let lines = self.run(&["oauth-token"]).await?;
        lines
            .iter()
            .map(|l| l.trim())
            .find(|l| l.to_ascii_lowercase().starts_with("bearer "))
            .map(str::to_string)
            .ok_or_else(|| anyhow!("`{} oauth-token` printed no bearer token", self.binary))
    }
}

/// Pick the most useful error text from a failed `cf` invocation
fn failure_message(stdout: &str, stderr: &str) -> String {
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }

    let lines: Vec<&str> = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    match lines.iter().position(|l| *l == "FAILED") {
        Some(pos) if pos + 1 < lines.len() => lines[pos + 1..].join(" "),
        _ => lines.last().copied().unwrap_or("no output").to_string(),
    }
}
