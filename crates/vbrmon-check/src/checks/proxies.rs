//! Backup proxy evaluation.

use vbrmon_common::models::Proxy;
use vbrmon_common::outcome::CheckOutcome;
use vbrmon_common::state::CheckState;

fn proxy_type_display(proxy_type: &str) -> &str {
    match proxy_type {
        "ViProxy" => "VMware vSphere",
        "HvProxy" => "Microsoft Hyper-V",
        "GeneralPurposeProxy" => "General Purpose",
        other => other,
    }
}

pub fn check_proxy(proxy: &Proxy) -> CheckOutcome {
    let service = format!("Veeam Proxy {}", proxy.name);

    let mut state = CheckState::Ok;
    let mut status_parts = Vec::new();

    if proxy.is_online == Some(false) {
        state = state.worst(CheckState::Crit);
        status_parts.push("OFFLINE");
    } else {
        status_parts.push("online");
    }
    if proxy.is_disabled == Some(true) {
        state = state.worst(CheckState::Warn);
        status_parts.push("disabled");
    }
    if proxy.is_out_of_date == Some(true) {
        state = state.worst(CheckState::Warn);
        status_parts.push("outdated components");
    }

    let type_display = proxy_type_display(proxy.proxy_type.as_deref().unwrap_or("Unknown"));
    let summary = format!("{type_display} proxy: {}", status_parts.join(", "));

    let mut outcome = CheckOutcome::new(service, state, summary);
    if let Some(host) = proxy.host_name.as_deref().filter(|h| !h.is_empty()) {
        outcome = outcome.with_detail(format!("Host: {host}"));
    }
    if let Some(description) = proxy.description.as_deref().filter(|d| !d.is_empty()) {
        outcome = outcome.with_detail(format!("Description: {description}"));
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy() -> Proxy {
        Proxy {
            name: "proxy-01".to_string(),
            proxy_type: Some("ViProxy".to_string()),
            is_online: Some(true),
            is_disabled: Some(false),
            is_out_of_date: Some(false),
            ..Default::default()
        }
    }

    #[test]
    fn online_proxy_is_ok() {
        let outcome = check_proxy(&proxy());
        assert_eq!(outcome.state, CheckState::Ok);
        assert_eq!(outcome.summary, "VMware vSphere proxy: online");
        assert_eq!(outcome.service, "Veeam Proxy proxy-01");
    }

    #[test]
    fn offline_proxy_is_crit() {
        let mut p = proxy();
        p.is_online = Some(false);
        let outcome = check_proxy(&p);
        assert_eq!(outcome.state, CheckState::Crit);
        assert!(outcome.summary.contains("OFFLINE"));
    }

    #[test]
    fn disabled_and_outdated_warn_but_offline_still_wins() {
        let mut p = proxy();
        p.is_disabled = Some(true);
        let outcome = check_proxy(&p);
        assert_eq!(outcome.state, CheckState::Warn);
        assert!(outcome.summary.contains("disabled"));

        p.is_online = Some(false);
        p.is_out_of_date = Some(true);
        let outcome = check_proxy(&p);
        assert_eq!(outcome.state, CheckState::Crit);
        assert!(outcome.summary.contains("OFFLINE"));
        assert!(outcome.summary.contains("outdated components"));
    }

    #[test]
    fn unmapped_type_passes_through() {
        let mut p = proxy();
        p.proxy_type = Some("CdpProxy".to_string());
        let outcome = check_proxy(&p);
        assert!(outcome.summary.starts_with("CdpProxy proxy:"));
    }
}
