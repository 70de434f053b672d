//! Scale-out backup repository evaluation.

use crate::enum_state::EnumStateRule;
use serde::Deserialize;
use std::collections::HashMap;
use vbrmon_common::models::ScaleOutRepository;
use vbrmon_common::outcome::CheckOutcome;
use vbrmon_common::state::CheckState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScaleOutParams {
    /// Overrides for the per-extent status map.
    pub extent_states: HashMap<String, CheckState>,
}

fn extent_rule(params: &ScaleOutParams) -> EnumStateRule {
    EnumStateRule::new(&[
        ("Normal", CheckState::Ok),
        ("Pending", CheckState::Ok),
        ("Sealed", CheckState::Ok),
        ("Evacuate", CheckState::Warn),
        ("Maintenance", CheckState::Warn),
        ("ResyncRequired", CheckState::Warn),
        ("TenantEvacuating", CheckState::Warn),
    ])
    .with_overrides(&params.extent_states)
}

pub fn check_scaleout(repo: &ScaleOutRepository, params: &ScaleOutParams) -> CheckOutcome {
    let service = format!("Veeam SOBR {}", repo.name);
    let rule = extent_rule(params);

    let extents = repo
        .performance_tier
        .as_ref()
        .map(|tier| tier.performance_extents.as_slice())
        .unwrap_or(&[]);

    if extents.is_empty() {
        return CheckOutcome::new(
            service,
            CheckState::Warn,
            "No performance extents configured",
        );
    }

    let mut state = CheckState::Ok;
    let mut healthy = 0usize;
    let mut issues = Vec::new();

    for extent in extents {
        let mut extent_state = CheckState::Ok;
        for status in &extent.status {
            let status_state = rule.state_for(status);
            if status_state > CheckState::Ok {
                issues.push(format!("{}: {status}", extent.name));
            }
            extent_state = extent_state.worst(status_state);
        }
        if extent_state == CheckState::Ok {
            healthy += 1;
        }
        state = state.worst(extent_state);
    }

    let mut summary_parts = vec![format!("Extents: {healthy}/{} healthy", extents.len())];
    summary_parts.extend(issues.iter().map(|issue| format!("Extent issue: {issue}")));

    let mut outcome = CheckOutcome::new(service, state, summary_parts.join(", "))
        .with_measurement("sobr_extents_total", extents.len() as f64)
        .with_measurement("sobr_extents_healthy", healthy as f64);

    if repo.capacity_tier.as_ref().is_some_and(|t| t.enabled) {
        outcome = outcome.with_detail("Capacity tier: enabled".to_string());
    }
    if repo.archive_tier.as_ref().is_some_and(|t| t.enabled) {
        outcome = outcome.with_detail("Archive tier: enabled".to_string());
    }
    if let Some(policy) = repo
        .placement_policy
        .as_ref()
        .and_then(|p| p.policy_type.as_deref())
    {
        outcome = outcome.with_detail(format!("Placement policy: {policy}"));
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use vbrmon_common::models::{Extent, PerformanceTier, TierConfig};

    fn sobr(extents: Vec<Extent>) -> ScaleOutRepository {
        ScaleOutRepository {
            name: "SOBR-01".to_string(),
            performance_tier: Some(PerformanceTier {
                performance_extents: extents,
            }),
            ..Default::default()
        }
    }

    fn extent(name: &str, status: &[&str]) -> Extent {
        Extent {
            name: name.to_string(),
            status: status.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn all_normal_extents_are_ok() {
        let repo = sobr(vec![
            extent("ext-1", &["Normal"]),
            extent("ext-2", &["Normal"]),
        ]);
        let outcome = check_scaleout(&repo, &ScaleOutParams::default());
        assert_eq!(outcome.state, CheckState::Ok);
        assert_eq!(outcome.summary, "Extents: 2/2 healthy");
        assert_eq!(outcome.service, "Veeam SOBR SOBR-01");
    }

    #[test]
    fn maintenance_extent_warns_and_is_named() {
        let repo = sobr(vec![
            extent("ext-1", &["Normal"]),
            extent("ext-2", &["Maintenance"]),
        ]);
        let outcome = check_scaleout(&repo, &ScaleOutParams::default());
        assert_eq!(outcome.state, CheckState::Warn);
        assert!(outcome.summary.contains("Extents: 1/2 healthy"));
        assert!(outcome.summary.contains("Extent issue: ext-2: Maintenance"));
    }

    #[test]
    fn sealed_extent_is_ok() {
        let repo = sobr(vec![extent("ext-1", &["Sealed"])]);
        let outcome = check_scaleout(&repo, &ScaleOutParams::default());
        assert_eq!(outcome.state, CheckState::Ok);
    }

    #[test]
    fn no_extents_warns() {
        let repo = ScaleOutRepository {
            name: "SOBR-empty".to_string(),
            ..Default::default()
        };
        let outcome = check_scaleout(&repo, &ScaleOutParams::default());
        assert_eq!(outcome.state, CheckState::Warn);
        assert_eq!(outcome.summary, "No performance extents configured");
    }

    #[test]
    fn tier_notices_appear_in_details() {
        let mut repo = sobr(vec![extent("ext-1", &["Normal"])]);
        repo.capacity_tier = Some(TierConfig { enabled: true });
        let outcome = check_scaleout(&repo, &ScaleOutParams::default());
        assert!(outcome
            .details
            .iter()
            .any(|d| d == "Capacity tier: enabled"));
    }

    #[test]
    fn extent_override_escalates() {
        let mut params = ScaleOutParams::default();
        params
            .extent_states
            .insert("Maintenance".to_string(), CheckState::Crit);
        let repo = sobr(vec![extent("ext-1", &["Maintenance"])]);
        let outcome = check_scaleout(&repo, &params);
        assert_eq!(outcome.state, CheckState::Crit);
    }
}
