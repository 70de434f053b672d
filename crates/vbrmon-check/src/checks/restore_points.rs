//! Recent restore point evaluation over the time-filtered bulk fetch.

use vbrmon_common::models::RestorePoint;
use vbrmon_common::outcome::CheckOutcome;
use vbrmon_common::state::CheckState;

/// Evaluate the restore points created inside the polling window.
///
/// An empty window means no backup on the whole server produced a restore
/// point recently, which warrants attention even before any per-job check
/// fires. Malware verdicts on individual points escalate; NotScanned is
/// not flagged here because scanning is opt-in and most points carry it.
pub fn check_restore_points(points: &[RestorePoint], window_days: i64) -> CheckOutcome {
    let service = "Veeam Restore Points".to_string();

    if points.is_empty() {
        return CheckOutcome::new(
            service,
            CheckState::Warn,
            format!("No restore points created in the last {window_days} days"),
        )
        .with_measurement("restore_points_recent", 0.0);
    }

    let mut state = CheckState::Ok;
    let mut infected = Vec::new();
    let mut suspicious = Vec::new();
    for point in points {
        match point.malware_status.as_deref() {
            Some("Infected") => {
                state = state.worst(CheckState::Crit);
                if let Some(name) = point.name.as_deref() {
                    infected.push(name);
                }
            }
            Some("Suspicious") => {
                state = state.worst(CheckState::Warn);
                if let Some(name) = point.name.as_deref() {
                    suspicious.push(name);
                }
            }
            _ => {}
        }
    }

    let mut summary_parts = vec![format!(
        "{} restore points in the last {window_days} days",
        points.len()
    )];
    if !infected.is_empty() {
        summary_parts.push(format!("Infected: {}", infected.join(", ")));
    }
    if !suspicious.is_empty() {
        summary_parts.push(format!("Suspicious: {}", suspicious.join(", ")));
    }

    CheckOutcome::new(service, state, summary_parts.join(", "))
        .with_measurement("restore_points_recent", points.len() as f64)
}
