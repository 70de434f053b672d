//! Per-object task session evaluation.

use crate::enum_state::EnumStateRule;
use serde::Deserialize;
use std::collections::HashMap;
use vbrmon_common::models::TaskSession;
use vbrmon_common::outcome::CheckOutcome;
use vbrmon_common::state::CheckState;
use vbrmon_common::units::{format_duration_hms, render_bytes, render_timespan};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskParams {
    /// Overrides for the task-result state map.
    pub result_states: HashMap<String, CheckState>,
    /// Warn when the last completed backup is older than this many hours.
    pub max_backup_age_hours: Option<u64>,
    /// Warn when the task ran longer than this many hours.
    pub max_duration_hours: Option<u64>,
}

fn result_rule(params: &TaskParams) -> EnumStateRule {
    EnumStateRule::new(&[
        ("Success", CheckState::Ok),
        ("Warning", CheckState::Warn),
        ("Failed", CheckState::Crit),
        ("None", CheckState::Ok),
    ])
    .with_overrides(&params.result_states)
}

fn state_display(state: &str) -> &str {
    match state {
        "Stopped" => "completed",
        "Working" => "running",
        "Starting" => "starting",
        "Stopping" => "stopping",
        "Pausing" => "pausing",
        "Resuming" => "resuming",
        "WaitingTape" => "waiting for tape",
        "Idle" => "idle",
        "Postprocessing" => "postprocessing",
        "WaitingRepository" => "waiting for repository",
        "WaitingSlot" => "waiting for slot",
        other => other,
    }
}

/// Reduce a window of task sessions to the latest session per object name,
/// by end time with creation time as the fallback.
pub fn latest_per_object(sessions: &[TaskSession]) -> Vec<&TaskSession> {
    let mut latest: HashMap<&str, &TaskSession> = HashMap::new();
    for session in sessions {
        match latest.get(session.name.as_str()) {
            Some(current) if current.recency_key() >= session.recency_key() => {}
            _ => {
                latest.insert(&session.name, session);
            }
        }
    }
    let mut picked: Vec<&TaskSession> = latest.into_values().collect();
    picked.sort_by(|a, b| a.name.cmp(&b.name));
    picked
}

pub fn check_task(task: &TaskSession, params: &TaskParams) -> CheckOutcome {
    let service = format!("Veeam Task {}", task.name);

    let task_state = task.state.as_deref().unwrap_or("Unknown");
    let result = task
        .result
        .as_ref()
        .and_then(|r| r.result.as_deref())
        .unwrap_or("None");

    let mut state = result_rule(params).state_for(result);
    let mut summary_parts = vec![
        format!("State: {}", state_display(task_state)),
        format!("Result: {result}"),
    ];

    let progress = task.progress.as_ref();
    if task_state == "Working" {
        // An in-flight task has no meaningful result yet.
        state = CheckState::Ok;
        let percent = progress.and_then(|p| p.progress_percent).unwrap_or(0.0);
        summary_parts.push(format!("Progress: {percent:.0}%"));
    } else {
        if let Some(duration) = task.duration_seconds {
            summary_parts.push(format!("Last Duration: {}", format_duration_hms(duration)));
        }
        if let Some(processed) = progress.and_then(|p| p.processed_size) {
            summary_parts.push(format!("Processed: {}", render_bytes(processed as f64)));
        }
    }

    if let (Some(max_age), Some(age)) = (params.max_backup_age_hours, task.backup_age_seconds) {
        if task_state == "Stopped" && age > max_age * 3_600 {
            state = state.worst(CheckState::Warn);
            summary_parts.push(format!(
                "Last backup {} ago exceeds threshold of {max_age}h",
                render_timespan(age)
            ));
        }
    }
    if let (Some(max_duration), Some(duration)) = (params.max_duration_hours, task.duration_seconds)
    {
        if duration > max_duration * 3_600 {
            state = state.worst(CheckState::Warn);
            summary_parts.push(format!(
                "Duration {} exceeds threshold of {max_duration}h",
                render_timespan(duration)
            ));
        }
    }

    let mut outcome = CheckOutcome::new(service, state, summary_parts.join(", "));

    if let Some(age) = task.backup_age_seconds {
        outcome = outcome.with_measurement("backup_age", age as f64);
    }
    if let Some(duration) = task.duration_seconds {
        outcome = outcome.with_measurement("backup_duration", duration as f64);
    }
    if let Some(progress) = progress {
        if let Some(size) = progress.processed_size {
            outcome = outcome.with_measurement("backup_size_processed", size as f64);
        }
        if let Some(size) = progress.read_size {
            outcome = outcome.with_measurement("backup_size_read", size as f64);
        }
        if let Some(size) = progress.transferred_size {
            outcome = outcome.with_measurement("backup_size_transferred", size as f64);
        }
    }
    if let Some(message) = task
        .result
        .as_ref()
        .and_then(|r| r.message.as_deref())
        .filter(|m| !m.is_empty())
    {
        outcome = outcome.with_detail(format!("Message: {message}"));
    }

    outcome
}
