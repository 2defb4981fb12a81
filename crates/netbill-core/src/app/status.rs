//! Status - ダッシュボード向けのスナップショット

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::orchestrator::TaskOrchestrator;
use crate::domain::{NEVER, TaskName, TaskResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub task_name: TaskName,
    pub title: &'static str,
    /// Epoch millis, `0` when never run.
    pub last_run: i64,
    pub last_run_at: Option<DateTime<Utc>>,
    pub since: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub running: bool,
    pub tasks: Vec<TaskStatus>,
    pub history: Vec<TaskResult>,
}

impl StatusReport {
    pub async fn collect(orchestrator: &TaskOrchestrator) -> Self {
        let now = orchestrator.clock().now();
        let last_run = orchestrator.last_run_times().await;
        let tasks = TaskName::ALL
            .iter()
            .map(|&name| {
                let ms = last_run.get(&name).copied().unwrap_or(NEVER);
                TaskStatus {
                    task_name: name,
                    title: name.title(),
                    last_run: ms,
                    last_run_at: (ms != NEVER)
                        .then(|| DateTime::<Utc>::from_timestamp_millis(ms))
                        .flatten(),
                    since: format_time_since(ms, now),
                }
            })
            .collect();

        Self {
            running: orchestrator.is_running(),
            tasks,
            history: orchestrator.task_history().await,
        }
    }
}

/// Coarse "time ago" label for a last-run value.
pub fn format_time_since(last_run_ms: i64, now: DateTime<Utc>) -> String {
    if last_run_ms == NEVER {
        return "Never run".to_string();
    }

    let seconds = (now.timestamp_millis() - last_run_ms).max(0) / 1000;
    if seconds < 60 {
        return format!("{seconds} seconds ago");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes} minutes ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} hours ago");
    }
    format!("{} days ago", hours / 24)
}
