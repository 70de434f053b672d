//! License status, expiry, and instance usage evaluation.

use crate::enum_state::EnumStateRule;
use crate::levels::{Direction, Levels};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use vbrmon_common::models::LicenseInfo;
use vbrmon_common::outcome::CheckOutcome;
use vbrmon_common::state::CheckState;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LicenseParams {
    /// Overrides for the license status map.
    pub status_states: HashMap<String, CheckState>,
    /// Lower bounds on days until license expiry.
    pub expiration_days: Levels,
    /// Lower bounds on days until support contract expiry. The resulting
    /// state is capped at Warn.
    pub support_expiration_days: Levels,
    /// Upper bounds on instance usage percent.
    pub instance_usage: Levels,
}

impl Default for LicenseParams {
    fn default() -> Self {
        Self {
            status_states: HashMap::new(),
            expiration_days: Levels::new(30.0, 7.0),
            support_expiration_days: Levels::new(30.0, 7.0),
            instance_usage: Levels::new(80.0, 95.0),
        }
    }
}

fn status_rule(params: &LicenseParams) -> EnumStateRule {
    EnumStateRule::new(&[
        ("Valid", CheckState::Ok),
        ("Invalid", CheckState::Crit),
        ("Expired", CheckState::Crit),
    ])
    .with_overrides(&params.status_states)
}

fn days_until(date: &str, now: DateTime<Utc>) -> Option<i64> {
    let parsed = DateTime::parse_from_rfc3339(date).ok()?.with_timezone(&Utc);
    Some((parsed - now).num_days())
}

pub fn check_license(
    license: &LicenseInfo,
    params: &LicenseParams,
    now: DateTime<Utc>,
) -> CheckOutcome {
    let service = "Veeam License".to_string();

    let status = license.status.as_deref().unwrap_or("Unknown");
    let mut state = status_rule(params).state_for(status);
    let mut summary_parts = vec![format!("License status: {status}")];
    let mut measurements = Vec::new();

    if let Some(days) = license
        .expiration_date
        .as_deref()
        .and_then(|d| days_until(d, now))
    {
        let exp_state = params
            .expiration_days
            .evaluate(days as f64, Direction::Lower);
        state = state.worst(exp_state);
        let bounds = format!(
            "(warn/crit below {:.0}/{:.0} days)",
            params.expiration_days.warn, params.expiration_days.crit
        );
        if days < 0 {
            summary_parts.push(format!("License expired {} days ago {bounds}", -days));
        } else {
            summary_parts.push(format!("License expires in {days} days {bounds}"));
        }
        measurements.push(("license_days_remaining", days as f64));
    }

    if let Some(days) = license
        .support_expiration_date
        .as_deref()
        .and_then(|d| days_until(d, now))
    {
        // A lapsed support contract never blocks backups.
        let support_state = params
            .support_expiration_days
            .evaluate(days as f64, Direction::Lower)
            .min(CheckState::Warn);
        state = state.worst(support_state);
        if days < 0 {
            summary_parts.push(format!("Support contract expired {} days ago", -days));
        } else if support_state > CheckState::Ok {
            summary_parts.push(format!("Support contract expires in {days} days"));
        }
        measurements.push(("support_days_remaining", days as f64));
    }

    if let Some(summary) = &license.instance_license_summary {
        if summary.licensed_instances_number > 0.0 {
            let used = summary.used_instances_number;
            let licensed = summary.licensed_instances_number;
            let usage_percent = used / licensed * 100.0;
            let usage_state = params.instance_usage.evaluate(usage_percent, Direction::Upper);
            state = state.worst(usage_state);
            summary_parts.push(format!(
                "Instance usage: {used:.0}/{licensed:.0} ({usage_percent:.1}%)"
            ));
            measurements.push(("license_instances_used", used));
            measurements.push(("license_instances_licensed", licensed));
            measurements.push(("license_instances_usage_percent", usage_percent));
        }
    }

    let mut outcome = CheckOutcome::new(service, state, summary_parts.join(", "));
    for (name, value) in measurements {
        outcome = outcome.with_measurement(name, value);
    }
    if let Some(edition) = license.edition.as_deref() {
        outcome = outcome.with_detail(format!("Edition: {edition}"));
    }
    if let Some(license_type) = license.license_type.as_deref() {
        outcome = outcome.with_detail(format!("Type: {license_type}"));
    }
    if let Some(licensed_to) = license.licensed_to.as_deref().filter(|l| !l.is_empty()) {
        outcome = outcome.with_detail(format!("Licensed to: {licensed_to}"));
    }
    if license.auto_update_enabled == Some(true) {
        outcome = outcome.with_detail("Auto-update: enabled".to_string());
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use vbrmon_common::models::InstanceLicenseSummary;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap()
    }

    fn license(expiry: &str) -> LicenseInfo {
        LicenseInfo {
            status: Some("Valid".to_string()),
            edition: Some("Enterprise Plus".to_string()),
            expiration_date: Some(expiry.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn valid_license_far_from_expiry_is_ok() {
        let outcome = check_license(
            &license("2027-08-01T00:00:00Z"),
            &LicenseParams::default(),
            now(),
        );
        assert_eq!(outcome.state, CheckState::Ok);
        assert!(outcome.summary.contains("License status: Valid"));
        assert!(outcome.summary.contains("expires in 365 days"));
    }

    #[test]
    fn expiry_thresholds_are_lower_bounds() {
        let params = LicenseParams::default();
        let near = check_license(&license("2026-08-21T00:00:00Z"), &params, now());
        assert_eq!(near.state, CheckState::Warn);

        let imminent = check_license(&license("2026-08-06T00:00:00Z"), &params, now());
        assert_eq!(imminent.state, CheckState::Crit);
    }

    #[test]
    fn expired_license_is_crit_with_days_ago() {
        let outcome = check_license(
            &license("2026-07-22T00:00:00Z"),
            &LicenseParams::default(),
            now(),
        );
        assert_eq!(outcome.state, CheckState::Crit);
        assert!(outcome.summary.contains("expired 10 days ago"));
    }

    #[test]
    fn invalid_status_is_crit() {
        let mut lic = license("2027-08-01T00:00:00Z");
        lic.status = Some("Invalid".to_string());
        let outcome = check_license(&lic, &LicenseParams::default(), now());
        assert_eq!(outcome.state, CheckState::Crit);
    }

    #[test]
    fn unmapped_status_is_ok() {
        let mut lic = license("2027-08-01T00:00:00Z");
        lic.status = Some("Evaluation".to_string());
        let outcome = check_license(&lic, &LicenseParams::default(), now());
        assert_eq!(outcome.state, CheckState::Ok);
    }

    #[test]
    fn support_expiry_is_capped_at_warn() {
        let mut lic = license("2027-08-01T00:00:00Z");
        lic.support_expiration_date = Some("2026-07-01T00:00:00Z".to_string());
        let outcome = check_license(&lic, &LicenseParams::default(), now());
        assert_eq!(outcome.state, CheckState::Warn);
        assert!(outcome.summary.contains("Support contract expired"));
    }

    #[test]
    fn instance_usage_upper_bounds() {
        let mut lic = license("2027-08-01T00:00:00Z");
        lic.instance_license_summary = Some(InstanceLicenseSummary {
            licensed_instances_number: 100.0,
            used_instances_number: 96.0,
        });
        let outcome = check_license(&lic, &LicenseParams::default(), now());
        assert_eq!(outcome.state, CheckState::Crit);
        assert!(outcome.summary.contains("Instance usage: 96/100 (96.0%)"));
    }

    #[test]
    fn unparseable_expiry_is_skipped() {
        let outcome = check_license(&license("soon"), &LicenseParams::default(), now());
        assert_eq!(outcome.state, CheckState::Ok);
        assert!(!outcome.summary.contains("expires"));
    }
}
