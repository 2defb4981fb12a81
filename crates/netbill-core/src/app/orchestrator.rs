//! TaskOrchestrator - メンテナンスタスクの直列実行
//!
//! # フロー（各 `run_*` 共通）
//! 1. RunGate を取得（取れなければ busy 結果を即返す。履歴には残さない）
//! 2. 本体と記録をガードごと spawn したタスクで実行する。呼び出し側の
//!    future が drop されても最後まで走り、結果は必ず履歴に残る
//! 3. タスク本体 → `Result<TaskOutcome, TaskError>` → `TaskResult`、
//!    last-run 更新、履歴の先頭に追加
//! 4. ゲート解放（spawn したタスクの終了時に guard が drop）

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Datelike;
use serde_json::json;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::gate::RunGate;
use crate::domain::{
    DayOfMonthTrigger, LastRunTimes, TaskError, TaskHistory, TaskName, TaskOutcome, TaskResult,
};
use crate::ports::{Clock, PersistenceClient, RouterClient, TaskEventSink};

struct OrchestratorState {
    history: TaskHistory,
    last_run: LastRunTimes,
}

/// Everything a spawned run needs; shared between the handle and its runs.
struct Shared {
    router: Arc<dyn RouterClient>,
    persistence: Arc<dyn PersistenceClient>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn TaskEventSink>,
    gate: Arc<RunGate>,
    state: Mutex<OrchestratorState>,
}

/// Runs the named maintenance tasks one at a time and keeps their results.
///
/// Build it with [`OrchestratorBuilder`](super::OrchestratorBuilder). The
/// `run_*` methods never fail: every error is folded into the returned
/// [`TaskResult`]. A run that got past the gate always finishes and is
/// recorded, even if the caller stops awaiting it.
pub struct TaskOrchestrator {
    shared: Arc<Shared>,
}

impl TaskOrchestrator {
    pub(crate) fn new(
        router: Arc<dyn RouterClient>,
        persistence: Arc<dyn PersistenceClient>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn TaskEventSink>,
        history_capacity: usize,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                router,
                persistence,
                clock,
                events,
                gate: Arc::new(RunGate::new()),
                state: Mutex::new(OrchestratorState {
                    history: TaskHistory::with_capacity(history_capacity),
                    last_run: LastRunTimes::new(),
                }),
            }),
        }
    }

    pub async fn run_block_unpaid_clients_task(&self) -> TaskResult {
        self.run(TaskName::BlockUnpaidClients).await
    }

    pub async fn run_sync_leases_task(&self) -> TaskResult {
        self.run(TaskName::SyncLeases).await
    }

    pub async fn run_check_payments_task(&self) -> TaskResult {
        self.run(TaskName::CheckPayments).await
    }

    /// Run one task by name. Must be called from within a Tokio runtime.
    pub async fn run(&self, name: TaskName) -> TaskResult {
        // ゲートは最初の await より前に取る
        let Some(guard) = self.shared.gate.try_acquire() else {
            info!(task = %name, "rejected: another task is running");
            return TaskResult::busy(name, self.shared.clock.now());
        };

        let shared = Arc::clone(&self.shared);
        let run = tokio::spawn(async move {
            let _guard = guard;
            shared.execute(name).await
        });

        match run.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => {
                error!(task = %name, error = %err, "maintenance task was cancelled");
                TaskResult::from_error(name, &TaskError::Interrupted, self.shared.clock.now())
            }
        }
    }

    /// Newest-first copy of the recorded results.
    pub async fn task_history(&self) -> Vec<TaskResult> {
        self.shared.state.lock().await.history.snapshot()
    }

    /// Epoch millis of each task's last executed run (`0` = never).
    pub async fn last_run_times(&self) -> BTreeMap<TaskName, i64> {
        self.shared.state.lock().await.last_run.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.shared.gate.is_running()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.shared.clock
    }

    /// Start the block task in the background when today matches `trigger`.
    ///
    /// The caller may await the handle or drop it; the run is logged either
    /// way. Must be called from within a Tokio runtime.
    pub fn trigger_if_due(self: &Arc<Self>, trigger: DayOfMonthTrigger) -> Option<JoinHandle<TaskResult>> {
        let today = self.shared.clock.today();
        if !trigger.is_due(today) {
            info!(
                day = today.day(),
                trigger_day = trigger.day(),
                "today is day {}, not day {}. cron task not executed",
                today.day(),
                trigger.day()
            );
            return None;
        }

        let this = Arc::clone(self);
        let day = trigger.day();
        Some(tokio::spawn(async move {
            let result = this.run_block_unpaid_clients_task().await;
            if result.success {
                info!(day, message = %result.message, "day {day} cron task completed");
            } else {
                warn!(day, message = %result.message, "day {day} cron task failed");
            }
            result
        }))
    }

    /// Fire the monthly unpaid-client block if today is the 20th.
    pub fn simulate_day20_cron(self: &Arc<Self>) -> Option<JoinHandle<TaskResult>> {
        self.trigger_if_due(DayOfMonthTrigger::BILLING_DAY)
    }
}

impl Shared {
    /// Body and record step of one run. The caller holds the gate.
    async fn execute(&self, name: TaskName) -> TaskResult {
        info!(task = %name, "running maintenance task");
        let body = match name {
            TaskName::BlockUnpaidClients => self.block_unpaid_clients().await,
            TaskName::SyncLeases => self.sync_leases().await,
            TaskName::CheckPayments => self.check_payments().await,
        };

        let finished_at = self.clock.now();
        let result = {
            let mut state = self.state.lock().await;
            let result = match body {
                Ok(outcome) => {
                    state.last_run.record(name, finished_at);
                    TaskResult::from_outcome(name, outcome, finished_at)
                }
                Err(err) => {
                    error!(task = %name, error = %err, "maintenance task failed");
                    TaskResult::from_error(name, &err, finished_at)
                }
            };
            state.history.push(result.clone());
            result
        };

        if result.success {
            info!(task = %name, message = %result.message, "maintenance task completed");
        } else {
            warn!(task = %name, message = %result.message, "maintenance task reported failure");
        }
        self.events.task_finished(&result);
        result
    }

    async fn ensure_connected(&self) -> Result<(), TaskError> {
        if self.router.connect().await? {
            Ok(())
        } else {
            Err(TaskError::Connection)
        }
    }

    async fn block_unpaid_clients(&self) -> Result<TaskOutcome, TaskError> {
        self.ensure_connected().await?;
        let report = self.router.block_unpaid_clients().await?;

        let outcome = if report.success {
            TaskOutcome::success(format!(
                "Successfully blocked {} unpaid clients",
                report.blocked_count
            ))
        } else {
            TaskOutcome::failure(format!(
                "Failed to block clients: {}",
                report.error_message.as_deref().unwrap_or("Unknown error")
            ))
        };
        Ok(outcome.with_details(json!({
            "blockedCount": report.blocked_count,
            "error": report.error_message,
        })))
    }

    async fn sync_leases(&self) -> Result<TaskOutcome, TaskError> {
        self.ensure_connected().await?;
        let synced = self.router.sync_leases_to_database().await?;

        Ok(if synced {
            TaskOutcome::success("Successfully synchronized leases with database")
        } else {
            TaskOutcome::failure("Failed to synchronize leases with database")
        })
    }

    async fn check_payments(&self) -> Result<TaskOutcome, TaskError> {
        let report = self.persistence.run_overdue_payment_check().await;

        let outcome = if report.contains("ERROR") {
            TaskOutcome::failure(format!("Failed to check for overdue payments: {report}"))
        } else {
            TaskOutcome::success("Successfully checked for overdue payments")
        };
        Ok(outcome.with_details(json!({ "result": report })))
    }
}
