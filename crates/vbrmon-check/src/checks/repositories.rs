//! Backup repository capacity and health evaluation.

use crate::levels::{Direction, Levels};
use serde::Deserialize;
use vbrmon_common::models::Repository;
use vbrmon_common::outcome::CheckOutcome;
use vbrmon_common::state::CheckState;
use vbrmon_common::units::{render_bytes, render_percent};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// API repository type to service-name category prefix.
const REPO_TYPE_CATEGORY: &[(&str, &str)] = &[
    ("WinLocal", "Local"),
    ("LinuxLocal", "Local"),
    ("LinuxHardened", "Hardened"),
    ("Smb", "SMB"),
    ("Nfs", "NFS"),
    ("AzureBlob", "Azure"),
    ("AzureDataBox", "Azure DataBox"),
    ("AzureArchive", "Azure Archive"),
    ("AmazonS3", "S3"),
    ("AmazonSnowballEdge", "Snowball"),
    ("AmazonS3Glacier", "Glacier"),
    ("S3Compatible", "S3"),
    ("S3GlacierCompatible", "S3 Glacier"),
    ("GoogleCloud", "GCS"),
    ("IBMCloud", "IBM Cloud"),
    ("WasabiCloud", "Wasabi"),
    ("VeeamDataCloudVault", "Veeam Cloud"),
    ("SmartObjectS3", "S3"),
    ("Cloud", "Cloud"),
    ("DDBoost", "DataDomain"),
    ("ExaGrid", "ExaGrid"),
    ("HPStoreOnceIntegration", "StoreOnce"),
    ("HPStoreOnce", "StoreOnce"),
    ("Quantum", "Quantum"),
    ("Infinidat", "Infinidat"),
    ("Fujitsu", "Fujitsu"),
    ("ExtendableRepository", "Extendable"),
];

fn repo_category(repo: &Repository) -> String {
    // Scale-out extents are named by their role, not the backing type.
    if let Some(details) = &repo.scale_out_repository_details {
        return match details.extent_type.as_deref() {
            Some("Capacity") => "SOBR Capacity".to_string(),
            Some("Archive") => "SOBR Archive".to_string(),
            _ => "SOBR Extent".to_string(),
        };
    }
    let repo_type = repo.repo_type.as_deref().unwrap_or("Unknown");
    REPO_TYPE_CATEGORY
        .iter()
        .find(|(api, _)| *api == repo_type)
        .map(|(_, display)| display.to_string())
        .unwrap_or_else(|| repo_type.to_string())
}

/// Service name for a repository, "Veeam Repository {category} - {name}".
pub fn repository_service_name(repo: &Repository) -> String {
    format!("Veeam Repository {} - {}", repo_category(repo), repo.name)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepositoryParams {
    /// Upper bounds on used-space percent.
    pub usage_levels: Levels,
    /// Optional lower bounds on free space, in bytes.
    pub free_space_levels: Option<Levels>,
}

impl Default for RepositoryParams {
    fn default() -> Self {
        Self {
            usage_levels: Levels::new(80.0, 90.0),
            free_space_levels: None,
        }
    }
}

pub fn check_repository(repo: &Repository, params: &RepositoryParams) -> CheckOutcome {
    let service = repository_service_name(repo);

    if repo.is_online == Some(false) {
        return CheckOutcome::new(service, CheckState::Crit, "Repository is OFFLINE");
    }

    let capacity_gb = repo.capacity_gb.unwrap_or(0.0);
    let free_gb = repo.free_gb.unwrap_or(0.0);
    // The API's usedSpaceGB reflects logical data size, not disk usage, so
    // used space is recomputed from capacity and free.
    let used_gb = if capacity_gb > 0.0 {
        capacity_gb - free_gb
    } else {
        0.0
    };
    let used_percent = if capacity_gb > 0.0 {
        used_gb / capacity_gb * 100.0
    } else {
        0.0
    };
    let capacity_bytes = capacity_gb * GIB;
    let free_bytes = free_gb * GIB;
    let used_bytes = used_gb * GIB;

    let mut state = CheckState::Ok;
    let mut summary_parts = Vec::new();

    if repo.is_out_of_date == Some(true) {
        state = state.worst(CheckState::Warn);
        summary_parts.push("Repository has outdated components".to_string());
    }

    let (usage_state, usage_text) =
        params
            .usage_levels
            .check(used_percent, Direction::Upper, "Used", render_percent);
    state = state.worst(usage_state);
    summary_parts.push(usage_text);

    if let Some(free_levels) = &params.free_space_levels {
        let (free_state, free_text) =
            free_levels.check(free_bytes, Direction::Lower, "Free", render_bytes);
        state = state.worst(free_state);
        summary_parts.push(free_text);
    }

    summary_parts.push(format!(
        "Capacity: {}, Free: {}",
        render_bytes(capacity_bytes),
        render_bytes(free_bytes)
    ));

    let mut outcome = CheckOutcome::new(service, state, summary_parts.join(", "))
        .with_measurement("repository_capacity", capacity_bytes)
        .with_measurement("repository_free", free_bytes)
        .with_measurement("repository_used", used_bytes)
        .with_measurement("repository_used_percent", used_percent);

    if let Some(host) = repo.host_name.as_deref().filter(|h| !h.is_empty()) {
        outcome = outcome.with_detail(format!("Host: {host}"));
    }
    if let Some(path) = repo.path.as_deref().filter(|p| !p.is_empty()) {
        outcome = outcome.with_detail(format!("Path: {path}"));
    }

    outcome
}
