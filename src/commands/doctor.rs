//! Doctor Command - Triage the targeted Cloud Foundry space
//!
//! Checks the `cf` session, inspects every app, and lists routes and
//! services that have no app bound to them.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::Cli;
use crate::application::exit_policy;
use crate::application::use_cases::doctor::{DoctorOutcome, RunDoctorUseCase};
use crate::context::CliContext;
use crate::exit_codes;
use crate::output::{OutputFormat, ProgressIndicator};
use crate::triage::TriageReport;

/// Arguments for the doctor command
#[derive(Args, Debug)]
pub struct DoctorArgs {}

/// Doctor result for JSON output
#[derive(Debug, Serialize)]
pub struct DoctorResult<'a> {
    pub healthy: bool,
    #[serde(flatten)]
    pub report: &'a TriageReport,
}

/// Run the doctor command
pub async fn run(ctx: &CliContext, _cli: &Cli, _args: &DoctorArgs) -> Result<i32> {
    let conn = match ctx.connect().await {
        Ok(conn) => conn,
        Err(e) => {
            ctx.output.error(&format!("doctor: {:#}", e));
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    let format = ctx.output.format();
    if format != OutputFormat::Json {
        ctx.output.print("");
        ctx.output.section(REPORT_HEADER);
        ctx.output.print("");
    }

    let progress = if format == OutputFormat::Table && !ctx.output.is_quiet() {
        Some(ProgressIndicator::spinner("Triaging apps, routes, and services..."))
    } else {
        None
    };

    let outcome = RunDoctorUseCase::execute(&conn, &ctx.config.thresholds).await;

    if let Some(p) = &progress {
        p.finish_and_clear();
    }

    match outcome {
        Ok(DoctorOutcome::NotLoggedIn) => {
            ctx.output
                .error("doctor cannot work without being logged in to CF");
            ctx.output.info("Run 'cf login' and try again");
            Ok(exit_codes::AUTH_REQUIRED)
        }
        Ok(DoctorOutcome::Completed {
            report,
            missing_target,
        }) => {
            if missing_target {
                ctx.output
                    .warn("WARN: It seems that your cloudfoundry has no space or org...");
            }
            output_report(ctx, &report)?;
            Ok(exit_policy::doctor_exit_code(
                ctx.config.report.fail_on_triage,
                !report.is_healthy(),
            ))
        }
        Err(e) => {
            ctx.output.error(&format!("doctor: {:#}", e));
            Ok(exit_codes::PLATFORM_ERROR)
        }
    }
}

const REPORT_HEADER: &str = "doctor: time to triage cloudfoundry";

/// One line of the text report before styling
#[derive(Debug, Clone, PartialEq)]
enum ReportLine {
    Blank,
    Ok(String),
    Section(String),
    /// App triage point, rendered as a table row in table format
    Finding(String),
    Alert(String),
}

#[cfg(test)]
impl ReportLine {
    fn text(&self) -> &str {
        match self {
            Self::Blank => "",
            Self::Ok(t) | Self::Section(t) | Self::Finding(t) | Self::Alert(t) => t,
        }
    }
}

/// Lay out the report body that follows the header
fn report_lines(report: &TriageReport) -> Vec<ReportLine> {
    if report.is_healthy() {
        return vec![ReportLine::Ok("doctor: Everything looks OK!".to_string())];
    }

    let mut lines = Vec::new();

    if !report.app_findings.is_empty() {
        lines.push(ReportLine::Section(
            "Detected triage points for apps: ".to_string(),
        ));
        lines.extend(
            report
                .app_findings
                .iter()
                .map(|f| ReportLine::Finding(f.report_line())),
        );
    }
    lines.push(ReportLine::Blank);

    if !report.unbound_routes.is_empty() {
        lines.push(ReportLine::Section(
            "Following routes do not have any app bound to them:".to_string(),
        ));
        lines.extend(report.unbound_routes.iter().map(|r| {
            ReportLine::Alert(format!("Host: {} <--->  Domain: {}", r.host, r.domain))
        }));
    }
    lines.push(ReportLine::Blank);

    if !report.unbound_services.is_empty() {
        lines.push(ReportLine::Section(
            "Following services do not have any app bound to them:".to_string(),
        ));
        lines.extend(report.unbound_services.iter().map(|s| {
            ReportLine::Alert(format!("Service: {} <--->  Name: {}", s.service, s.name))
        }));
    }
    lines.push(ReportLine::Blank);

    lines.push(ReportLine::Section(format!(
        "Total Number of Apps: {}",
        report.total_apps
    )));
    lines.push(ReportLine::Section(format!(
        "Total Number of Running Apps: {}",
        report.running_apps
    )));

    lines
}

/// Output the report in the appropriate format
fn output_report(ctx: &CliContext, report: &TriageReport) -> Result<()> {
    let format = ctx.output.format();
    if format == OutputFormat::Json {
        ctx.output.json(&DoctorResult {
            healthy: report.is_healthy(),
            report,
        })?;
        return Ok(());
    }

    // Table format groups the app findings into one grid
    let mut findings_shown = false;
    for line in report_lines(report) {
        match line {
            ReportLine::Blank => ctx.output.print(""),
            ReportLine::Ok(text) => ctx.output.success(&text),
            ReportLine::Section(text) => ctx.output.section(&text),
            ReportLine::Alert(text) => ctx.output.alert(&text),
            ReportLine::Finding(_) if format == OutputFormat::Table => {
                if !findings_shown {
                    ctx.output.findings_table(&report.app_findings);
                    findings_shown = true;
                }
            }
            ReportLine::Finding(text) => ctx.output.alert(&text),
        }
    }

    ctx.output.debug(&format!(
        "{} triage points in total",
        report.triage_count()
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::{AppFinding, FindingKind, UnboundRoute, UnboundService};

    fn text(lines: &[ReportLine]) -> Vec<&str> {
        lines.iter().map(ReportLine::text).collect()
    }

    fn report_with_findings() -> TriageReport {
        TriageReport {
            app_findings: vec![
                AppFinding::new("web", Some(0), FindingKind::HighCpu(85.0)),
                AppFinding::new("worker", None, FindingKind::NoRoute),
            ],
            unbound_routes: vec![UnboundRoute {
                space: "dev".to_string(),
                host: "old-web".to_string(),
                domain: "apps.example.com".to_string(),
            }],
            unbound_services: vec![UnboundService {
                name: "orders-db".to_string(),
                service: "p-mysql".to_string(),
            }],
            total_apps: 3,
            running_apps: 2,
        }
    }

    #[test]
    fn test_healthy_report_says_everything_ok() {
        let report = TriageReport {
            total_apps: 2,
            running_apps: 2,
            ..Default::default()
        };
        let lines = report_lines(&report);
        assert_eq!(
            lines,
            vec![ReportLine::Ok("doctor: Everything looks OK!".to_string())]
        );
    }

    #[test]
    fn test_report_lines_with_findings() {
        let lines = report_lines(&report_with_findings());
        assert_eq!(
            text(&lines),
            vec![
                "Detected triage points for apps: ",
                "web <---> CPU usage over 85 percent!",
                "worker <---> You have a running application that does not have a route!",
                "",
                "Following routes do not have any app bound to them:",
                "Host: old-web <--->  Domain: apps.example.com",
                "",
                "Following services do not have any app bound to them:",
                "Service: p-mysql <--->  Name: orders-db",
                "",
                "Total Number of Apps: 3",
                "Total Number of Running Apps: 2",
            ]
        );
        assert!(matches!(lines[1], ReportLine::Finding(_)));
        assert!(matches!(lines[5], ReportLine::Alert(_)));
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let report = TriageReport {
            unbound_services: vec![UnboundService {
                name: "cache".to_string(),
                service: "p-redis".to_string(),
            }],
            total_apps: 0,
            running_apps: 0,
            ..Default::default()
        };
        let lines = report_lines(&report);
        assert_eq!(
            text(&lines),
            vec![
                "",
                "",
                "Following services do not have any app bound to them:",
                "Service: p-redis <--->  Name: cache",
                "",
                "Total Number of Apps: 0",
                "Total Number of Running Apps: 0",
            ]
        );
    }

    #[test]
    fn test_json_result_carries_healthy_flag() {
        let report = report_with_findings();
        let json = serde_json::to_value(DoctorResult {
            healthy: report.is_healthy(),
            report: &report,
        })
        .unwrap();
        assert_eq!(json["healthy"], false);
        assert_eq!(json["total_apps"], 3);
        assert_eq!(json["app_findings"][0]["app"], "web");
        assert_eq!(json["unbound_routes"][0]["host"], "old-web");

        let healthy = TriageReport::default();
        let json = serde_json::to_value(DoctorResult {
            healthy: healthy.is_healthy(),
            report: &healthy,
        })
        .unwrap();
        assert_eq!(json["healthy"], true);
    }
}
