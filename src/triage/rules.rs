//! Threshold rules applied to app detail
//!
//! Every predicate is strict: a value sitting exactly on a threshold never
//! flags. Rules are independent; the same app can collect several findings,
//! one per instance for the per-instance rules.

use crate::config::Thresholds;
use crate::platform::{AppDetail, AppState, InstanceStats};

use super::{AppFinding, FindingKind};

pub fn exceeds_cpu(cpu_percent: f64, t: &Thresholds) -> bool {
    cpu_percent > t.cpu_percent
}

pub fn exceeds_disk(usage: u64, quota: u64, t: &Thresholds) -> bool {
    usage as f64 > quota as f64 * t.disk_ratio
}

pub fn exceeds_memory(usage: u64, quota: u64, t: &Thresholds) -> bool {
    usage as f64 > quota as f64 * t.memory_high_ratio
}

pub fn underuses_memory(usage: u64, quota: u64, t: &Thresholds) -> bool {
    (usage as f64) < quota as f64 * t.memory_low_ratio
}

/// Low memory and near-idle CPU on an app that runs more than one instance
pub fn is_idle_replica(instance: &InstanceStats, instance_count: usize, t: &Thresholds) -> bool {
    instance_count > 1
        && underuses_memory(instance.mem_usage, instance.mem_quota, t)
        && instance.cpu_percent < t.idle_cpu_percent
}

/// Findings for a single instance of an app with `instance_count` instances
pub fn evaluate_instance(
    app: &str,
    instance: &InstanceStats,
    instance_count: usize,
    t: &Thresholds,
) -> Vec<AppFinding> {
    let at = Some(instance.index);
    let mut findings = Vec::new();

    if exceeds_cpu(instance.cpu_percent, t) {
        findings.push(AppFinding::new(app, at, FindingKind::HighCpu(t.cpu_percent)));
    }
    if exceeds_disk(instance.disk_usage, instance.disk_quota, t) {
        findings.push(AppFinding::new(app, at, FindingKind::HighDisk(t.disk_ratio)));
    }
    if exceeds_memory(instance.mem_usage, instance.mem_quota, t) {
        findings.push(AppFinding::new(
            app,
            at,
            FindingKind::HighMemory(t.memory_high_ratio),
        ));
    }
    if underuses_memory(instance.mem_usage, instance.mem_quota, t) {
        findings.push(AppFinding::new(
            app,
            at,
            FindingKind::LowMemory(t.memory_low_ratio),
        ));
    }
    if is_idle_replica(instance, instance_count, t) {
        findings.push(AppFinding::new(app, at, FindingKind::IdleReplicas));
    }

    findings
}

/// Apply every rule that fits the app's state
///
/// Started apps get the staging, per-instance, and route checks. Stopped apps
/// only get the staging check. Apps in any other state are not triaged.
pub fn evaluate_app(detail: &AppDetail, t: &Thresholds) -> Vec<AppFinding> {
    let name = detail.summary.name.as_str();
    let mut findings = Vec::new();

    if let AppState::Other(_) = detail.summary.state {
        return findings;
    }

    if let Some(reason) = detail.staging_failed_reason.as_deref().filter(|r| !r.is_empty()) {
        findings.push(AppFinding::new(
            name,
            None,
            FindingKind::StagingFailed(reason.to_string()),
        ));
    }

    if detail.summary.state != AppState::Started {
        return findings;
    }

    // Down instances report no stats but still count as replicas
    let count = detail.instance_count.max(detail.instances.len());
    for instance in &detail.instances {
        findings.extend(evaluate_instance(name, instance, count, t));
    }

    if detail.routes.is_empty() {
        findings.push(AppFinding::new(name, None, FindingKind::NoRoute));
    }

    findings
}
