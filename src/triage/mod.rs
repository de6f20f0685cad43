//! Triage - Findings produced by the doctor rules
//!
//! `rules` evaluates thresholds against app detail, `tabular` picks unbound
//! routes and services out of `cf` listings. Both feed a [`TriageReport`].

pub mod rules;
pub mod tabular;

use std::fmt;

use serde::Serialize;

pub use rules::evaluate_app;
pub use tabular::{UnboundRoute, UnboundService, parse_unbound_route, parse_unbound_service};

/// What a rule found wrong with an app
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FindingKind {
    StagingFailed(String),
    /// Threshold in percent
    HighCpu(f64),
    /// Thresholds below are fractions of the quota
    HighDisk(f64),
    HighMemory(f64),
    LowMemory(f64),
    IdleReplicas,
    NoRoute,
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StagingFailed(reason) => write!(f, "StagingFailedReason: {}", reason),
            Self::HighCpu(pct) => write!(f, "CPU usage over {:.0} percent!", pct),
            Self::HighDisk(ratio) => {
                write!(f, "DiskUsage over {:.0} percent of DiskQuota", ratio * 100.0)
            }
            Self::HighMemory(ratio) => {
                write!(f, "MemUsage over {:.0} percent of MemQuota", ratio * 100.0)
            }
            Self::LowMemory(ratio) => write!(
                f,
                "MemUsage lower than {:.0} percent of MemQuota, scaledown is an option.",
                ratio * 100.0
            ),
            Self::IdleReplicas => f.write_str(
                "app has more than one instance running with very low resource consumption. candidate for scaling down.",
            ),
            Self::NoRoute => {
                f.write_str("You have a running application that does not have a route!")
            }
        }
    }
}

/// One triage point for one app
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppFinding {
    pub app: String,
    /// Instance index for per-instance rules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<usize>,
    pub kind: FindingKind,
    pub message: String,
}

impl AppFinding {
    pub fn new(app: &str, instance: Option<usize>, kind: FindingKind) -> Self {
        Self {
            app: app.to_string(),
            instance,
            message: kind.to_string(),
            kind,
        }
    }

    /// `<app> <---> <message>`, as the report prints it
    pub fn report_line(&self) -> String {
        format!("{} <---> {}", self.app, self.message)
    }
}

/// Full result of one doctor run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TriageReport {
    pub app_findings: Vec<AppFinding>,
    pub unbound_routes: Vec<UnboundRoute>,
    pub unbound_services: Vec<UnboundService>,
    pub total_apps: usize,
    pub running_apps: usize,
}

impl TriageReport {
    /// True when no rule fired and nothing is unbound
    pub fn is_healthy(&self) -> bool {
        self.app_findings.is_empty()
            && self.unbound_routes.is_empty()
            && self.unbound_services.is_empty()
    }

    pub fn triage_count(&self) -> usize {
        self.app_findings.len() + self.unbound_routes.len() + self.unbound_services.len()
    }
}
