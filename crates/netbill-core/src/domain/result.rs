//! Task results: what a maintenance run produced.
//!
//! A task body reports a [`TaskOutcome`] (or a [`TaskError`]); the orchestrator
//! stamps it with the task name and completion time to form a [`TaskResult`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::TaskError;
use super::task_name::TaskName;

pub const BUSY_MESSAGE: &str = "Another task is already running. Please try again later.";

/// Outcome of one task execution, as shown in the dashboard history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub task_name: TaskName,
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl TaskResult {
    /// Result handed back when the run gate is already held.
    pub fn busy(task_name: TaskName, timestamp: DateTime<Utc>) -> Self {
        Self {
            task_name,
            success: false,
            message: BUSY_MESSAGE.to_string(),
            timestamp,
            details: None,
        }
    }

    pub fn from_outcome(task_name: TaskName, outcome: TaskOutcome, timestamp: DateTime<Utc>) -> Self {
        Self {
            task_name,
            success: outcome.success,
            message: outcome.message,
            timestamp,
            details: outcome.details,
        }
    }

    pub fn from_error(task_name: TaskName, error: &TaskError, timestamp: DateTime<Utc>) -> Self {
        let text = error.to_string();
        Self {
            task_name,
            success: false,
            message: format!("Error running {} task: {}", task_label(task_name), text),
            timestamp,
            details: Some(serde_json::json!({ "error": text })),
        }
    }

    pub fn is_busy_rejection(&self) -> bool {
        !self.success && self.details.is_none() && self.message == BUSY_MESSAGE
    }
}

fn task_label(task_name: TaskName) -> &'static str {
    match task_name {
        TaskName::BlockUnpaidClients => "block unpaid clients",
        TaskName::SyncLeases => "sync leases",
        TaskName::CheckPayments => "check payments",
    }
}

/// What a task body reports when it ran to the end without an error.
///
/// `success == false` here means the downstream call answered but reported a
/// failure of its own (a partial failure), not that the body blew up.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub success: bool,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl TaskOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            details: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
