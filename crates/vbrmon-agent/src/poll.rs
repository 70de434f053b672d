use crate::config::AgentConfig;
use chrono::Utc;
use vbrmon_check::checks::backup_objects::check_backup_object;
use vbrmon_check::checks::jobs::check_job;
use vbrmon_check::checks::license::check_license;
use vbrmon_check::checks::proxies::check_proxy;
use vbrmon_check::checks::repositories::check_repository;
use vbrmon_check::checks::restore_points::check_restore_points;
use vbrmon_check::checks::scaleout::check_scaleout;
use vbrmon_check::checks::server::check_server;
use vbrmon_check::checks::tasks::{check_task, latest_per_object};
use vbrmon_client::{PagedFetch, VbrClient};
use vbrmon_common::outcome::CheckOutcome;

/// One full poll cycle: authenticate, fetch every collection, evaluate
/// every record.
///
/// Authentication failure is fatal; after that each collection is
/// isolated, so an error on one resource never suppresses the outcomes of
/// the others. A collection that fails outright yields a single Unknown
/// outcome naming the failure; a partial fetch is evaluated as far as it
/// got.
pub async fn run_cycle(config: &AgentConfig) -> anyhow::Result<Vec<CheckOutcome>> {
    let client = VbrClient::connect(&config.connection).await?;
    let mut outcomes = Vec::new();

    let jobs = client.jobs().await;
    collection(&mut outcomes, "Veeam Jobs", &jobs, |job| {
        check_job(job, &config.checks.jobs)
    });

    let repositories = client.repositories().await;
    collection(&mut outcomes, "Veeam Repositories", &repositories, |repo| {
        check_repository(repo, &config.checks.repositories)
    });

    let scaleout = client.scale_out_repositories().await;
    collection(&mut outcomes, "Veeam SOBR", &scaleout, |repo| {
        check_scaleout(repo, &config.checks.scaleout)
    });

    let proxies = client.proxies().await;
    collection(&mut outcomes, "Veeam Proxies", &proxies, check_proxy);

    let tasks = client.task_sessions(config.task_session_hours).await;
    if tasks.records.is_empty() && tasks.error.is_some() {
        outcomes.push(fetch_failed("Veeam Tasks", &tasks));
    } else {
        for task in latest_per_object(&tasks.records) {
            outcomes.push(check_task(task, &config.checks.tasks));
        }
    }

    let restore_points = client.restore_points(config.restore_points_days).await;
    if restore_points.records.is_empty() && restore_points.error.is_some() {
        outcomes.push(fetch_failed("Veeam Restore Points", &restore_points));
    } else {
        outcomes.push(check_restore_points(
            &restore_points.records,
            config.restore_points_days,
        ));
    }

    let objects = client.backup_objects().await;
    collection(&mut outcomes, "Veeam Backup Objects", &objects, |obj| {
        check_backup_object(obj, &config.checks.backup_objects)
    });

    match client.license().await {
        Ok(license) => {
            outcomes.push(check_license(&license, &config.checks.license, Utc::now()))
        }
        Err(e) => {
            tracing::warn!(error = %e, "license fetch failed");
            outcomes.push(CheckOutcome::no_data(
                "Veeam License",
                format!("License fetch failed: {e}"),
            ));
        }
    }

    match client.server_info().await {
        Ok(info) => outcomes.push(check_server(&info)),
        Err(e) => {
            tracing::warn!(error = %e, "server info fetch failed");
            outcomes.push(CheckOutcome::no_data(
                "Veeam Backup Server",
                format!("Server info fetch failed: {e}"),
            ));
        }
    }

    Ok(outcomes)
}

fn collection<T>(
    outcomes: &mut Vec<CheckOutcome>,
    service: &str,
    fetched: &PagedFetch<T>,
    evaluate: impl Fn(&T) -> CheckOutcome,
) {
    if fetched.records.is_empty() {
        if let Some(error) = &fetched.error {
            tracing::warn!(service, error = %error, "collection fetch failed");
            outcomes.push(fetch_failed(service, fetched));
            return;
        }
    }
    if fetched.is_partial() {
        tracing::warn!(
            service,
            records = fetched.records.len(),
            "evaluating partial collection"
        );
    }
    outcomes.extend(fetched.records.iter().map(evaluate));
}

fn fetch_failed<T>(service: &str, fetched: &PagedFetch<T>) -> CheckOutcome {
    let reason = match &fetched.error {
        Some(error) => format!("Collection fetch failed: {error}"),
        None => "Collection fetch failed".to_string(),
    };
    CheckOutcome::no_data(service, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vbrmon_client::ClientError;
    use vbrmon_common::models::BackupJob;
    use vbrmon_common::state::CheckState;

    fn fetch(records: Vec<BackupJob>, error: Option<ClientError>) -> PagedFetch<BackupJob> {
        PagedFetch {
            records,
            calls: 1,
            elapsed: std::time::Duration::from_millis(5),
            error,
        }
    }

    #[test]
    fn failed_collection_becomes_single_unknown() {
        let mut outcomes = Vec::new();
        let fetched = fetch(Vec::new(), Some(ClientError::Timeout));
        collection(&mut outcomes, "Veeam Jobs", &fetched, |job| {
            check_job(job, &Default::default())
        });

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].state, CheckState::Unknown);
        assert_eq!(outcomes[0].service, "Veeam Jobs");
        assert!(outcomes[0].summary.contains("fetch failed"));
    }

    #[test]
    fn partial_collection_is_still_evaluated() {
        let mut outcomes = Vec::new();
        let job = BackupJob {
            name: "Nightly".to_string(),
            last_result: Some("Success".to_string()),
            ..Default::default()
        };
        let fetched = fetch(vec![job], Some(ClientError::Http { status: 500 }));
        collection(&mut outcomes, "Veeam Jobs", &fetched, |job| {
            check_job(job, &Default::default())
        });

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].state, CheckState::Ok);
    }

    #[test]
    fn failed_restore_point_fetch_reports_unknown() {
        let fetched: PagedFetch<vbrmon_common::models::RestorePoint> = PagedFetch {
            records: Vec::new(),
            calls: 1,
            elapsed: std::time::Duration::from_millis(5),
            error: Some(ClientError::Timeout),
        };
        let outcome = fetch_failed("Veeam Restore Points", &fetched);
        assert_eq!(outcome.state, CheckState::Unknown);
        assert_eq!(outcome.service, "Veeam Restore Points");
    }

    #[test]
    fn empty_clean_collection_emits_nothing() {
        let mut outcomes = Vec::new();
        let fetched = fetch(Vec::new(), None);
        collection(&mut outcomes, "Veeam Jobs", &fetched, |job| {
            check_job(job, &Default::default())
        });
        assert!(outcomes.is_empty());
    }
}
