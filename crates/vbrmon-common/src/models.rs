//! Normalized records for the VBR REST resource collections.
//!
//! Field sets mirror the API payloads with camelCase renames; everything
//! beyond the identifying name is optional with permissive defaults so a
//! partially populated payload still deserializes. Records are immutable
//! once materialized for a poll cycle.

use serde::Deserialize;

/// One backup or replication job, from `jobs/states`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupJob {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_result: Option<String>,
    #[serde(default)]
    pub last_run: Option<String>,
    #[serde(default)]
    pub next_run: Option<String>,
    #[serde(default)]
    pub next_run_policy: Option<String>,
    #[serde(default)]
    pub progress_percent: Option<f64>,
    #[serde(default)]
    pub objects_count: Option<u64>,
    #[serde(default)]
    pub repository_name: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub workload: Option<String>,
    #[serde(default)]
    pub high_priority: Option<bool>,
    #[serde(default)]
    pub last_run_age_seconds: Option<u64>,
    #[serde(default)]
    pub session_progress: Option<SessionProgress>,
}

/// Progress block of the last job session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub bottleneck: Option<String>,
    #[serde(default)]
    pub processed_size: Option<u64>,
    #[serde(default)]
    pub read_size: Option<u64>,
    #[serde(default)]
    pub transferred_size: Option<u64>,
    #[serde(default)]
    pub processing_rate: Option<String>,
    #[serde(default)]
    pub progress_percent: Option<f64>,
}

/// One backup repository, from `backupInfrastructure/repositories/states`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub repo_type: Option<String>,
    #[serde(rename = "capacityGB", default)]
    pub capacity_gb: Option<f64>,
    #[serde(rename = "freeGB", default)]
    pub free_gb: Option<f64>,
    /// Reported used space reflects logical data size, not physical disk
    /// usage; checks derive used space from capacity and free instead.
    #[serde(rename = "usedSpaceGB", default)]
    pub used_space_gb: Option<f64>,
    #[serde(default)]
    pub is_online: Option<bool>,
    #[serde(default)]
    pub is_out_of_date: Option<bool>,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scale_out_repository_details: Option<ScaleOutDetails>,
}

/// Membership block present on repositories that are scale-out extents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleOutDetails {
    #[serde(default)]
    pub extent_type: Option<String>,
    #[serde(default)]
    pub membership: Option<String>,
}

/// One scale-out backup repository, from
/// `backupInfrastructure/scaleOutRepositories`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleOutRepository {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub performance_tier: Option<PerformanceTier>,
    #[serde(default)]
    pub capacity_tier: Option<TierConfig>,
    #[serde(default)]
    pub archive_tier: Option<TierConfig>,
    #[serde(default)]
    pub placement_policy: Option<PlacementPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTier {
    #[serde(default)]
    pub performance_extents: Vec<Extent>,
}

/// One physical extent of a scale-out repository, with its status flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierConfig {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementPolicy {
    #[serde(rename = "type", default)]
    pub policy_type: Option<String>,
}

/// One backup proxy, from `backupInfrastructure/proxies/states`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proxy {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub proxy_type: Option<String>,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub is_online: Option<bool>,
    #[serde(default)]
    pub is_disabled: Option<bool>,
    #[serde(default)]
    pub is_out_of_date: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One per-object task session within a job run, from `taskSessions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSession {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub result: Option<TaskResult>,
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub backup_age_seconds: Option<u64>,
    #[serde(default)]
    pub progress: Option<SessionProgress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl TaskSession {
    /// Sort key for "most recent task per object": end time, falling back
    /// to creation time. ISO 8601 strings compare correctly as text.
    pub fn recency_key(&self) -> &str {
        self.end_time
            .as_deref()
            .or(self.creation_time.as_deref())
            .unwrap_or("")
    }
}

/// One protected object (VM, agent machine, ...), from `backupObjects`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupObject {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub platform_name: Option<String>,
    #[serde(default)]
    pub job_name: Option<String>,
    #[serde(default)]
    pub restore_points_count: Option<u64>,
    #[serde(default)]
    pub last_run_failed: Option<bool>,
    #[serde(default)]
    pub malware_status: Option<String>,
}

/// One restore point, from `restorePoints` (time-filtered bulk fetch).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorePoint {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub backup_object_id: Option<String>,
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub malware_status: Option<String>,
}

/// License document, from `license`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInfo {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "type", default)]
    pub license_type: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub licensed_to: Option<String>,
    #[serde(default)]
    pub support_id: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub support_expiration_date: Option<String>,
    #[serde(default)]
    pub auto_update_enabled: Option<bool>,
    #[serde(default)]
    pub instance_license_summary: Option<InstanceLicenseSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceLicenseSummary {
    #[serde(default)]
    pub licensed_instances_number: f64,
    #[serde(default)]
    pub used_instances_number: f64,
}

/// Server identity document, from `serverInfo`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub build_version: Option<String>,
    #[serde(default)]
    pub vbr_id: Option<String>,
    #[serde(default)]
    pub patches: Vec<String>,
    #[serde(default)]
    pub database_vendor: Option<String>,
    #[serde(default)]
    pub sql_server_edition: Option<String>,
    #[serde(default)]
    pub sql_server_version: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_deserializes_from_sparse_payload() {
        let job: BackupJob = serde_json::from_value(serde_json::json!({
            "name": "Daily VM Backup",
            "type": "VSphereBackup",
            "lastResult": "Success",
            "sessionProgress": {"duration": "00:12:30", "processedSize": 1024}
        }))
        .expect("job should parse");

        assert_eq!(job.name, "Daily VM Backup");
        assert_eq!(job.job_type.as_deref(), Some("VSphereBackup"));
        let progress = job.session_progress.unwrap();
        assert_eq!(progress.duration.as_deref(), Some("00:12:30"));
        assert_eq!(progress.processed_size, Some(1024));
        assert!(job.status.is_none());
    }

    #[test]
    fn repository_deserializes_gb_fields() {
        let repo: Repository = serde_json::from_value(serde_json::json!({
            "name": "Main Repo",
            "type": "WinLocal",
            "capacityGB": 1000.0,
            "freeGB": 100.0,
            "isOnline": true
        }))
        .expect("repository should parse");

        assert_eq!(repo.capacity_gb, Some(1000.0));
        assert_eq!(repo.free_gb, Some(100.0));
        assert_eq!(repo.is_online, Some(true));
    }

    #[test]
    fn task_recency_prefers_end_time() {
        let task: TaskSession = serde_json::from_value(serde_json::json!({
            "name": "vm-01",
            "creationTime": "2026-08-01T00:00:00Z",
            "endTime": "2026-08-01T01:00:00Z"
        }))
        .expect("task should parse");
        assert_eq!(task.recency_key(), "2026-08-01T01:00:00Z");

        let open: TaskSession = serde_json::from_value(serde_json::json!({
            "name": "vm-02",
            "creationTime": "2026-08-01T00:00:00Z"
        }))
        .expect("task should parse");
        assert_eq!(open.recency_key(), "2026-08-01T00:00:00Z");
    }
}
