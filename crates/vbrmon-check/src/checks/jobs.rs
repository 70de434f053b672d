//! Backup and replication job evaluation.

use crate::enum_state::EnumStateRule;
use serde::Deserialize;
use std::collections::HashMap;
use vbrmon_common::models::BackupJob;
use vbrmon_common::outcome::CheckOutcome;
use vbrmon_common::state::CheckState;
use vbrmon_common::units::{parse_duration_secs, parse_rate_bytes_per_sec, render_bytes, render_timespan};

/// API job type to service-name category prefix.
const JOB_TYPE_CATEGORY: &[(&str, &str)] = &[
    ("VSphereBackup", "VMware Backup"),
    ("VSphereReplica", "VMware Replica"),
    ("HyperVBackup", "Hyper-V Backup"),
    ("HyperVReplica", "Hyper-V Replica"),
    ("CloudDirectorBackup", "vCD Backup"),
    ("EntraIDTenantBackup", "Entra ID Backup"),
    ("EntraIDAuditLogBackup", "Entra ID Audit"),
    ("EntraIDTenantBackupCopy", "Entra ID Copy"),
    ("BackupCopy", "Backup Copy"),
    ("FileBackupCopy", "File Backup Copy"),
    ("LegacyBackupCopy", "Legacy Copy"),
    ("WindowsAgentBackup", "Windows Agent"),
    ("LinuxAgentBackup", "Linux Agent"),
    ("WindowsAgentBackupWorkstationPolicy", "Win Workstation"),
    ("LinuxAgentBackupWorkstationPolicy", "Linux Workstation"),
    ("WindowsAgentBackupServerPolicy", "Win Server Policy"),
    ("LinuxAgentBackupServerPolicy", "Linux Server Policy"),
    ("FileBackup", "File Backup"),
    ("ObjectStorageBackup", "Object Storage"),
    ("CloudBackupAzure", "Azure Backup"),
    ("CloudBackupAWS", "AWS Backup"),
    ("CloudBackupGoogle", "GCP Backup"),
    ("SureBackupContentScan", "SureBackup Scan"),
    ("Unknown", "Backup"),
];

fn job_category(job_type: &str) -> &str {
    JOB_TYPE_CATEGORY
        .iter()
        .find(|(api, _)| *api == job_type)
        .map(|(_, display)| *display)
        .unwrap_or(job_type)
}

/// Service name for a job, "Veeam Job {category} - {name}".
pub fn job_service_name(job: &BackupJob) -> String {
    let category = job_category(job.job_type.as_deref().unwrap_or("Unknown"));
    format!("Veeam Job {category} - {}", job.name)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobParams {
    /// Report a disabled job as Ok instead of applying the status map.
    pub ignore_disabled: bool,
    /// Overrides for the last-result state map.
    pub result_states: HashMap<String, CheckState>,
    /// Overrides for the job-status state map.
    pub status_states: HashMap<String, CheckState>,
    /// Warn when the last run is older than this many hours.
    pub max_age_hours: Option<u64>,
}

fn result_rule(params: &JobParams) -> EnumStateRule {
    EnumStateRule::new(&[
        ("Success", CheckState::Ok),
        ("Warning", CheckState::Warn),
        ("Failed", CheckState::Crit),
        ("None", CheckState::Ok),
    ])
    .with_overrides(&params.result_states)
}

fn status_rule(params: &JobParams) -> EnumStateRule {
    EnumStateRule::new(&[
        ("Running", CheckState::Ok),
        ("Inactive", CheckState::Ok),
        ("Disabled", CheckState::Warn),
        ("Enabled", CheckState::Ok),
        ("Stopping", CheckState::Ok),
        ("Stopped", CheckState::Ok),
        ("Starting", CheckState::Ok),
    ])
    .with_overrides(&params.status_states)
}

pub fn check_job(job: &BackupJob, params: &JobParams) -> CheckOutcome {
    let service = job_service_name(job);
    let status = job.status.as_deref().unwrap_or("Unknown");
    let last_result = job.last_result.as_deref().unwrap_or("None");

    if status == "Disabled" && params.ignore_disabled {
        return CheckOutcome::new(service, CheckState::Ok, "Job is disabled (ignored)");
    }

    let result_state = result_rule(params).state_for(last_result);
    let status_state = status_rule(params).state_for(status);
    let mut state = result_state.worst(status_state);

    let mut summary_parts = vec![
        format!("Status: {}", status.to_lowercase()),
        format!("Last result: {last_result}"),
    ];

    let progress = job.session_progress.as_ref();
    if status == "Running" {
        let percent = job.progress_percent.unwrap_or(0.0);
        summary_parts.push(format!("Progress: {percent:.0}%"));
    } else {
        if let Some(duration) = progress.and_then(|p| p.duration.as_deref()) {
            summary_parts.push(format!("Last Duration: {duration}"));
        }
        if let Some(processed) = progress.and_then(|p| p.processed_size).filter(|s| *s > 0) {
            summary_parts.push(format!("Processed: {}", render_bytes(processed as f64)));
        }
    }

    if let (Some(max_age), Some(age)) = (params.max_age_hours, job.last_run_age_seconds) {
        if age > max_age * 3_600 {
            state = state.worst(CheckState::Warn);
            summary_parts.push(format!(
                "Last run {} ago exceeds threshold of {max_age}h",
                render_timespan(age)
            ));
        }
    }

    let mut outcome = CheckOutcome::new(service, state, summary_parts.join(", "));

    if let Some(progress) = progress {
        if let Some(secs) = progress.duration.as_deref().and_then(parse_duration_secs) {
            outcome = outcome.with_measurement("job_duration", secs as f64);
        }
        if let Some(size) = progress.processed_size.filter(|s| *s > 0) {
            outcome = outcome.with_measurement("job_size_processed", size as f64);
        }
        if let Some(size) = progress.read_size.filter(|s| *s > 0) {
            outcome = outcome.with_measurement("job_size_read", size as f64);
        }
        if let Some(size) = progress.transferred_size.filter(|s| *s > 0) {
            outcome = outcome.with_measurement("job_size_transferred", size as f64);
        }
        if let Some(rate) = progress
            .processing_rate
            .as_deref()
            .and_then(parse_rate_bytes_per_sec)
        {
            outcome = outcome.with_measurement("job_speed", rate);
        }
        if let Some(bottleneck) = progress
            .bottleneck
            .as_deref()
            .filter(|b| !matches!(*b, "NotDefined" | "Unknown"))
        {
            outcome = outcome.with_detail(format!("Bottleneck: {bottleneck}"));
        }
    }

    if let Some(job_type) = job.job_type.as_deref() {
        outcome = outcome.with_detail(format!("Type: {job_type}"));
    }
    if let Some(count) = job.objects_count {
        outcome = outcome.with_detail(format!("Objects: {count}"));
    }
    if let Some(repository) = job.repository_name.as_deref().filter(|r| !r.is_empty()) {
        outcome = outcome.with_detail(format!("Repository: {repository}"));
    }
    if let Some(next_run) = job.next_run.as_deref() {
        outcome = outcome.with_detail(format!("Next Run: {next_run}"));
    }

    outcome
}
