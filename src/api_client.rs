//! API Client - HTTP client for the Cloud Controller v2 API
//!
//! This module provides the read-only calls doctor makes against a
//! foundation:
//! - Space summary (the app listing)
//! - App summary (routes and staging failure reason)
//! - App instance stats (CPU, memory, and disk usage)

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::constants::USER_AGENT;
use crate::platform::{AppState, AppSummary, InstanceStats, RouteRef};

/// API client for a Cloud Controller
#[derive(Clone)]
pub struct CloudControllerClient {
    client: Client,
    base_url: String,
    token: String,
}

/// `GET /v2/spaces/:guid/summary`
#[derive(Debug, Deserialize)]
pub struct SpaceSummaryResponse {
    #[serde(default)]
    pub apps: Vec<SpaceAppDto>,
}

/// App entry inside a space summary
#[derive(Debug, Deserialize)]
pub struct SpaceAppDto {
    pub guid: String,
    pub name: String,
    pub state: String,
}

/// `GET /v2/apps/:guid/summary`
#[derive(Debug, Deserialize)]
pub struct AppSummaryResponse {
    #[serde(default)]
    pub staging_failed_reason: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

#[derive(Debug, Deserialize)]
pub struct RouteDto {
    #[serde(default)]
    pub host: String,
    pub domain: DomainDto,
}

#[derive(Debug, Deserialize)]
pub struct DomainDto {
    pub name: String,
}

/// One value of the `GET /v2/apps/:guid/stats` map
#[derive(Debug, Deserialize)]
pub struct InstanceStatsDto {
    pub state: String,
    /// Absent for instances that are down or crashed
    #[serde(default)]
    pub stats: Option<StatsDto>,
}

#[derive(Debug, Deserialize)]
pub struct StatsDto {
    #[serde(default)]
    pub mem_quota: u64,
    #[serde(default)]
    pub disk_quota: u64,
    pub usage: UsageDto,
}

#[derive(Debug, Deserialize)]
pub struct UsageDto {
    /// Fraction of one core
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub mem: u64,
    #[serde(default)]
    pub disk: u64,
}

/// Error body returned by the v2 API
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub error_code: Option<String>,
}

impl CloudControllerClient {
    /// Create a client for `target` authenticating with a `bearer ...` token
    pub fn new(
        target: &str,
        token: String,
        skip_ssl_validation: bool,
        timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(skip_ssl_validation)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: target.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// List the apps of a space
    pub async fn space_apps(&self, space_guid: &str) -> Result<Vec<AppSummary>> {
        let summary: SpaceSummaryResponse = self
            .get_json(&format!("/v2/spaces/{}/summary", space_guid))
            .await?;

        Ok(summary
            .apps
            .into_iter()
            .map(|app| AppSummary {
                guid: app.guid,
                name: app.name,
                state: AppState::parse(&app.state),
            })
            .collect())
    }

    /// Staging failure reason and mapped routes of an app
    pub async fn app_summary(&self, app_guid: &str) -> Result<(Option<String>, Vec<RouteRef>)> {
        let summary: AppSummaryResponse = self
            .get_json(&format!("/v2/apps/{}/summary", app_guid))
            .await?;

        let reason = summary.staging_failed_reason.filter(|r| !r.is_empty());
        let routes = summary
            .routes
            .into_iter()
            .map(|r| RouteRef {
                host: r.host,
                domain: r.domain.name,
            })
            .collect();

        Ok((reason, routes))
    }

    /// Per-instance usage of a started app
    ///
    /// Returns the number of instances the platform knows about, down ones
    /// included, alongside the usage of those that report stats.
    pub async fn app_stats(&self, app_guid: &str) -> Result<(usize, Vec<InstanceStats>)> {
        let stats: BTreeMap<String, InstanceStatsDto> = self
            .get_json(&format!("/v2/apps/{}/stats", app_guid))
            .await?;
        let count = stats.len();
        Ok((count, instances_from_stats(stats)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, &self.token)
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to send request to {}: {} (is_connect: {}, is_timeout: {})",
                    url,
                    e,
                    e.is_connect(),
                    e.is_timeout()
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// Handle error response from the Cloud Controller
    async fn handle_error_response(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> anyhow::Error {
        let error_msg = match response.json::<ErrorResponse>().await {
            Ok(err) => match err.error_code {
                Some(code) => format!("{} ({})", err.description, code),
                None => err.description,
            },
            Err(_) => format!("Server returned status {}", status),
        };

        match status {
            StatusCode::UNAUTHORIZED => anyhow::anyhow!(
                "Authentication failed: {}. Use 'cf login' to log in again.",
                error_msg
            ),
            StatusCode::FORBIDDEN => anyhow::anyhow!("Access denied: {}", error_msg),
            StatusCode::NOT_FOUND => anyhow::anyhow!("Not found: {}", error_msg),
            StatusCode::BAD_REQUEST => anyhow::anyhow!("Invalid request: {}", error_msg),
            StatusCode::INTERNAL_SERVER_ERROR => anyhow::anyhow!("Server error: {}", error_msg),
            _ => anyhow::anyhow!("Request failed ({}): {}", status, error_msg),
        }
    }
}

/// Convert the stats map into instance records ordered by index
///
/// Instances without a `stats` block (down, crashed, starting) are skipped.
/// CPU is scaled from a fraction of one core to a percentage.
pub fn instances_from_stats(stats: BTreeMap<String, InstanceStatsDto>) -> Vec<InstanceStats> {
    let mut instances: Vec<InstanceStats> = stats
        .into_iter()
        .filter_map(|(key, dto)| {
            let index = key.parse::<usize>().ok()?;
            let stats = dto.stats?;
            Some(InstanceStats {
                index,
                state: dto.state,
                cpu_percent: stats.usage.cpu * 100.0,
                mem_usage: stats.usage.mem,
                mem_quota: stats.mem_quota,
                disk_usage: stats.usage.disk,
                disk_quota: stats.disk_quota,
            })
        })
        .collect();
    instances.sort_by_key(|i| i.index);
    instances
}
