use serde::Deserialize;
use vbrmon_check::checks::backup_objects::BackupObjectParams;
use vbrmon_check::checks::jobs::JobParams;
use vbrmon_check::checks::license::LicenseParams;
use vbrmon_check::checks::repositories::RepositoryParams;
use vbrmon_check::checks::scaleout::ScaleOutParams;
use vbrmon_check::checks::tasks::TaskParams;
use vbrmon_client::ConnectConfig;

#[derive(Debug, Deserialize)]
pub struct AgentConfig {
    pub connection: ConnectConfig,
    /// Server-side window for the restore point bulk fetch.
    #[serde(default = "default_restore_points_days")]
    pub restore_points_days: i64,
    /// Server-side window for the task session fetch.
    #[serde(default = "default_task_session_hours")]
    pub task_session_hours: i64,
    #[serde(default)]
    pub checks: CheckParams,
}

fn default_restore_points_days() -> i64 {
    7
}

fn default_task_session_hours() -> i64 {
    24
}

/// Per-check parameter sections, each with its own serde defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckParams {
    pub jobs: JobParams,
    pub repositories: RepositoryParams,
    pub scaleout: ScaleOutParams,
    pub tasks: TaskParams,
    pub backup_objects: BackupObjectParams,
    pub license: LicenseParams,
}

impl AgentConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: AgentConfig = toml::from_str(
            r#"
            [connection]
            host = "backup.example.net"
            username = "svc_monitor"
            password = "secret"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.restore_points_days, 7);
        assert_eq!(config.task_session_hours, 24);
        assert_eq!(config.connection.port, 9419);
        assert!(!config.checks.jobs.ignore_disabled);
        assert_eq!(config.checks.repositories.usage_levels.warn, 80.0);
    }

    #[test]
    fn check_sections_override_defaults() {
        let config: AgentConfig = toml::from_str(
            r#"
            restore_points_days = 14

            [connection]
            host = "backup.example.net"
            username = "svc_monitor"
            password = "secret"
            verify_tls = false

            [checks.jobs]
            ignore_disabled = true
            max_age_hours = 48

            [checks.jobs.result_states]
            Warning = "crit"

            [checks.repositories.usage_levels]
            warn = 70.0
            crit = 85.0
            "#,
        )
        .expect("config should parse");

        assert!(!config.connection.verify_tls);
        assert_eq!(config.restore_points_days, 14);
        assert!(config.checks.jobs.ignore_disabled);
        assert_eq!(config.checks.jobs.max_age_hours, Some(48));
        assert_eq!(
            config.checks.jobs.result_states.get("Warning"),
            Some(&vbrmon_common::state::CheckState::Crit)
        );
        assert_eq!(config.checks.repositories.usage_levels.crit, 85.0);
    }
}
