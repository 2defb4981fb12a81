//! TaskEventSink 実装
//!
//! - NoopEventSink: 何もしない（デフォルト）
//! - TracingEventSink: ダッシュボードのトースト相当をログに出す

use tracing::{info, warn};

use crate::domain::{TaskName, TaskResult};
use crate::ports::TaskEventSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl TaskEventSink for NoopEventSink {
    fn task_finished(&self, _result: &TaskResult) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    /// Notification title for a finished run.
    pub fn title(result: &TaskResult) -> &'static str {
        match (result.task_name, result.success) {
            (TaskName::BlockUnpaidClients, true) => "Auto-Block Task Completed",
            (TaskName::BlockUnpaidClients, false) => "Auto-Block Task Failed",
            (TaskName::SyncLeases, true) => "Lease Sync Completed",
            (TaskName::SyncLeases, false) => "Lease Sync Failed",
            (TaskName::CheckPayments, true) => "Payment Check Completed",
            (TaskName::CheckPayments, false) => "Payment Check Failed",
        }
    }
}

impl TaskEventSink for TracingEventSink {
    fn task_finished(&self, result: &TaskResult) {
        let title = Self::title(result);
        if result.success {
            info!(task = %result.task_name, title, "{}", result.message);
        } else {
            warn!(task = %result.task_name, title, "{}", result.message);
        }
    }
}
