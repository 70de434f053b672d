//! Protected object (VM, agent machine) backup evaluation.

use crate::enum_state::EnumStateRule;
use serde::Deserialize;
use std::collections::HashMap;
use vbrmon_common::models::BackupObject;
use vbrmon_common::outcome::CheckOutcome;
use vbrmon_common::state::CheckState;

fn object_type_display(object_type: &str) -> &str {
    match object_type {
        "VirtualMachine" => "VM",
        "Computer" => "Agent",
        "VCloud" => "vCloud",
        other => other,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupObjectParams {
    /// Warn when the restore point count is at or below this value.
    pub min_restore_points_warn: u64,
    /// Overrides for the malware verdict map.
    pub malware_states: HashMap<String, CheckState>,
}

impl Default for BackupObjectParams {
    fn default() -> Self {
        Self {
            min_restore_points_warn: 0,
            malware_states: HashMap::new(),
        }
    }
}

fn malware_rule(params: &BackupObjectParams) -> EnumStateRule {
    EnumStateRule::new(&[
        ("Clean", CheckState::Ok),
        ("Infected", CheckState::Crit),
        ("Suspicious", CheckState::Warn),
        ("NotScanned", CheckState::Warn),
    ])
    .with_overrides(&params.malware_states)
}

pub fn check_backup_object(obj: &BackupObject, params: &BackupObjectParams) -> CheckOutcome {
    let service = format!("Veeam Backup {}", obj.name);

    let restore_points = obj.restore_points_count.unwrap_or(0);
    let mut state = CheckState::Ok;
    let mut summary_parts = Vec::new();

    if obj.last_run_failed == Some(true) {
        state = state.worst(CheckState::Crit);
        summary_parts.push("Last backup failed".to_string());
    } else if restore_points <= params.min_restore_points_warn {
        state = state.worst(CheckState::Warn);
        summary_parts.push("No recent restore points".to_string());
    } else {
        summary_parts.push("OK".to_string());
    }

    if let Some(job_name) = obj.job_name.as_deref().filter(|j| !j.is_empty()) {
        summary_parts.push(format!("Job: {job_name}"));
    }

    let type_display = object_type_display(obj.object_type.as_deref().unwrap_or("Unknown"));
    match obj.platform_name.as_deref().filter(|p| !p.is_empty()) {
        Some(platform) => summary_parts.push(format!("Type: {type_display} ({platform})")),
        None => summary_parts.push(format!("Type: {type_display}")),
    }
    summary_parts.push(format!("Restore points: {restore_points}"));

    if let Some(verdict) = obj.malware_status.as_deref() {
        let malware_state = malware_rule(params).state_for(verdict);
        state = state.worst(malware_state);
        if malware_state > CheckState::Ok {
            summary_parts.push(format!("Malware status: {verdict}"));
        }
    }

    CheckOutcome::new(service, state, summary_parts.join(", "))
        .with_measurement("restore_points", restore_points as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object() -> BackupObject {
        BackupObject {
            name: "vm-web-01".to_string(),
            object_type: Some("VirtualMachine".to_string()),
            platform_name: Some("VMware".to_string()),
            job_name: Some("Daily VMs".to_string()),
            restore_points_count: Some(14),
            last_run_failed: Some(false),
            malware_status: Some("Clean".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn protected_object_is_ok() {
        let outcome = check_backup_object(&object(), &BackupObjectParams::default());
        assert_eq!(outcome.state, CheckState::Ok);
        assert_eq!(outcome.service, "Veeam Backup vm-web-01");
        assert!(outcome.summary.contains("Type: VM (VMware)"));
        assert!(outcome.summary.contains("Restore points: 14"));
    }

    #[test]
    fn failed_last_run_is_crit() {
        let mut obj = object();
        obj.last_run_failed = Some(true);
        let outcome = check_backup_object(&obj, &BackupObjectParams::default());
        assert_eq!(outcome.state, CheckState::Crit);
        assert!(outcome.summary.contains("Last backup failed"));
    }

    #[test]
    fn zero_restore_points_warns_by_default() {
        let mut obj = object();
        obj.restore_points_count = Some(0);
        let outcome = check_backup_object(&obj, &BackupObjectParams::default());
        assert_eq!(outcome.state, CheckState::Warn);
        assert!(outcome.summary.contains("No recent restore points"));
    }

    #[test]
    fn infected_object_is_crit_even_with_restore_points() {
        let mut obj = object();
        obj.malware_status = Some("Infected".to_string());
        let outcome = check_backup_object(&obj, &BackupObjectParams::default());
        assert_eq!(outcome.state, CheckState::Crit);
        assert!(outcome.summary.contains("Malware status: Infected"));
    }

    #[test]
    fn not_scanned_warns_but_can_be_overridden() {
        let mut obj = object();
        obj.malware_status = Some("NotScanned".to_string());

        let outcome = check_backup_object(&obj, &BackupObjectParams::default());
        assert_eq!(outcome.state, CheckState::Warn);

        let mut params = BackupObjectParams::default();
        params
            .malware_states
            .insert("NotScanned".to_string(), CheckState::Ok);
        let outcome = check_backup_object(&obj, &params);
        assert_eq!(outcome.state, CheckState::Ok);
    }

    #[test]
    fn missing_malware_status_is_not_flagged() {
        let mut obj = object();
        obj.malware_status = None;
        let outcome = check_backup_object(&obj, &BackupObjectParams::default());
        assert_eq!(outcome.state, CheckState::Ok);
    }
}
