//! Backup server identity reporting. Informational only.

use vbrmon_common::models::ServerInfo;
use vbrmon_common::outcome::CheckOutcome;
use vbrmon_common::state::CheckState;

pub fn check_server(info: &ServerInfo) -> CheckOutcome {
    let version = info.build_version.as_deref().unwrap_or("Unknown");
    let name = info.name.as_deref().unwrap_or("Unknown");

    let mut summary_parts = vec![format!("Version: {version}, Server: {name}")];
    if !info.patches.is_empty() {
        summary_parts.push(format!("Patches installed: {}", info.patches.len()));
    }

    let mut outcome = CheckOutcome::new(
        "Veeam Backup Server",
        CheckState::Ok,
        summary_parts.join(", "),
    );

    if let Some(latest) = info.patches.last() {
        outcome = outcome.with_detail(format!("Latest patch: {latest}"));
    }
    if let Some(vendor) = info.database_vendor.as_deref() {
        let mut db_info = format!("Database: {vendor}");
        if let Some(edition) = info.sql_server_edition.as_deref() {
            db_info.push_str(&format!(" ({edition})"));
        }
        if let Some(version) = info.sql_server_version.as_deref() {
            db_info.push_str(&format!(" v{version}"));
        }
        outcome = outcome.with_detail(db_info);
    }
    if let Some(platform) = info.platform.as_deref() {
        outcome = outcome.with_detail(format!("Platform: {platform}"));
    }
    if let Some(vbr_id) = info.vbr_id.as_deref() {
        outcome = outcome.with_detail(format!("Installation ID: {vbr_id}"));
    }

    outcome
}
