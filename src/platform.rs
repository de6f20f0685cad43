//! Platform - The seam between the doctor procedure and Cloud Foundry
//!
//! [`PlatformConnection`] exposes exactly what the triage needs: session
//! state, the app listing, per-app detail, and raw `cf` command output.
//! [`CfConnection`] implements it against a real foundation; tests provide
//! their own in-memory implementation.

use std::fmt;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Serialize;

use crate::api_client::CloudControllerClient;
use crate::cf_cli::CfCli;
use crate::session::CfSession;

/// Lifecycle state of an app as reported by the Cloud Controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    Started,
    Stopped,
    Other(String),
}

impl AppState {
    /// Parse a state string, ignoring case (`STARTED`, `started`, ...)
    pub fn parse(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "started" => Self::Started,
            "stopped" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("started"),
            Self::Stopped => f.write_str("stopped"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// One entry of the space's app listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSummary {
    pub guid: String,
    pub name: String,
    pub state: AppState,
}

/// Usage of a single running app instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceStats {
    pub index: usize,
    pub state: String,
    /// Percent of one core
    pub cpu_percent: f64,
    /// Bytes
    pub mem_usage: u64,
    pub mem_quota: u64,
    pub disk_usage: u64,
    pub disk_quota: u64,
}

/// A route mapped to an app
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRef {
    pub host: String,
    pub domain: String,
}

/// Everything the rules look at for one app
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppDetail {
    pub summary: AppSummary,
    pub staging_failed_reason: Option<String>,
    /// All instances of the app, including down ones without stats
    pub instance_count: usize,
    pub instances: Vec<InstanceStats>,
    pub routes: Vec<RouteRef>,
}

/// Operations doctor needs from the platform
#[async_trait]
pub trait PlatformConnection {
    async fn is_logged_in(&self) -> Result<bool>;

    async fn has_organization(&self) -> Result<bool>;

    async fn has_space(&self) -> Result<bool>;

    /// All apps in the targeted space
    async fn get_apps(&self) -> Result<Vec<AppSummary>>;

    /// Detail for one app; instance stats are only present for started apps
    async fn get_app(&self, app: &AppSummary) -> Result<AppDetail>;

    /// Run a `cf` subcommand without terminal output and return its lines
    async fn cli_command(&self, args: &[&str]) -> Result<Vec<String>>;
}

/// Connection to a real foundation, borrowing the `cf` CLI session
pub struct CfConnection {
    session: CfSession,
    cli: CfCli,
    client: Option<CloudControllerClient>,
}

impl CfConnection {
    /// Build a connection; the API client is only created for logged-in sessions
    pub async fn connect(
        session: CfSession,
        cli: CfCli,
        timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        let client = if session.is_logged_in() {
            let token = match cli.oauth_token().await {
                Ok(token) => token,
                Err(e) => {
                    tracing::warn!("Falling back to stored access token: {:#}", e);
                    session.access_token.clone()
                }
            };
            Some(CloudControllerClient::new(
                &session.target,
                token,
                session.ssl_disabled,
                timeout_secs,
                connect_timeout_secs,
            )?)
        } else {
            None
        };

        Ok(Self {
            session,
            cli,
            client,
        })
    }

    fn client(&self) -> Result<&CloudControllerClient> {
        self.client
            .as_ref()
            .ok_or_else(|| anyhow!("Not logged in. Use 'cf login' to log in."))
    }
}

#[async_trait]
impl PlatformConnection for CfConnection {
    async fn is_logged_in(&self) -> Result<bool> {
        Ok(self.session.is_logged_in())
    }

    async fn has_organization(&self) -> Result<bool> {
        Ok(self.session.has_organization())
    }

    async fn has_space(&self) -> Result<bool> {
        Ok(self.session.has_space())
    }

    async fn get_apps(&self) -> Result<Vec<AppSummary>> {
        if !self.session.has_space() {
            return Err(anyhow!(
                "No space targeted, use 'cf target -s SPACE' to target a space."
            ));
        }
        self.client()?.space_apps(&self.session.space.guid).await
    }

    async fn get_app(&self, app: &AppSummary) -> Result<AppDetail> {
        let client = self.client()?;
        let (staging_failed_reason, routes) = client.app_summary(&app.guid).await?;
        let (instance_count, instances) = if app.state == AppState::Started {
            client.app_stats(&app.guid).await?
        } else {
            (0, Vec::new())
        };

        Ok(AppDetail {
            summary: app.clone(),
            staging_failed_reason,
            instance_count,
            instances,
            routes,
        })
    }

    async fn cli_command(&self, args: &[&str]) -> Result<Vec<String>> {
        self.cli.run(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_parse_is_case_insensitive() {
        assert_eq!(AppState::parse("STARTED"), AppState::Started);
        assert_eq!(AppState::parse("stopped"), AppState::Stopped);
        assert_eq!(
            AppState::parse("PENDING"),
            AppState::Other("pending".to_string())
        );
        assert_eq!(AppState::Started.to_string(), "started");
    }

    #[tokio::test]
    async fn test_logged_out_connection_refuses_api_calls() {
        let conn = CfConnection::connect(
            CfSession::default(),
            CfCli::new("/nonexistent/cf", None),
            5,
            5,
        )
        .await
        .unwrap();

        assert!(!conn.is_logged_in().await.unwrap());
        assert!(conn.get_apps().await.is_err());
        let app = AppSummary {
            guid: "g".to_string(),
            name: "a".to_string(),
            state: AppState::Stopped,
        };
        let err = conn.get_app(&app).await.unwrap_err();
        assert!(err.to_string().contains("Not logged in"));
    }
}
