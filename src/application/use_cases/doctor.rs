use anyhow::{Context, Result};

use crate::config::Thresholds;
use crate::platform::{AppState, PlatformConnection};
use crate::triage::{TriageReport, evaluate_app, parse_unbound_route, parse_unbound_service};

pub enum DoctorOutcome {
    /// The session has no token; nothing was inspected
    NotLoggedIn,
    Completed {
        report: TriageReport,
        /// Org or space was not targeted when the run started
        missing_target: bool,
    },
}

pub struct RunDoctorUseCase;

impl RunDoctorUseCase {
    /// Environment check, app triage, then routes and services
    ///
    /// The first platform error aborts the run.
    pub async fn execute<C>(conn: &C, thresholds: &Thresholds) -> Result<DoctorOutcome>
    where
        C: PlatformConnection + Sync,
    {
        let logged_in = conn.is_logged_in().await?;
        let has_org = conn.has_organization().await?;
        let has_space = conn.has_space().await?;

        if !logged_in {
            return Ok(DoctorOutcome::NotLoggedIn);
        }
        let missing_target = !has_org || !has_space;

        let mut report = TriageReport::default();

        let apps = conn.get_apps().await.context("Failed to list apps")?;
        tracing::debug!("Inspecting {} apps", apps.len());

        for app in apps.iter().filter(|a| a.state == AppState::Started) {
            let detail = conn
                .get_app(app)
                .await
                .with_context(|| format!("Failed to inspect app {}", app.name))?;
            report.app_findings.extend(evaluate_app(&detail, thresholds));
        }
        for app in apps.iter().filter(|a| a.state == AppState::Stopped) {
            let detail = conn
                .get_app(app)
                .await
                .with_context(|| format!("Failed to inspect app {}", app.name))?;
            report.app_findings.extend(evaluate_app(&detail, thresholds));
        }

        report.unbound_routes = conn
            .cli_command(&["routes"])
            .await?
            .iter()
            .filter_map(|line| parse_unbound_route(line))
            .collect();

        report.unbound_services = conn
            .cli_command(&["services"])
            .await?
            .iter()
            .filter_map(|line| parse_unbound_service(line))
            .collect();

        report.total_apps = apps.len();
        report.running_apps = apps
            .iter()
            .filter(|a| a.state == AppState::Started)
            .count();

        Ok(DoctorOutcome::Completed {
            report,
            missing_target,
        })
    }
}
