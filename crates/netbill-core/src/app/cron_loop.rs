//! CronLoop - 月次トリガーの定期チェック
//!
//! OS の cron ではなく、プロセス内で `poll_interval` ごとに日付を見るだけ。
//! 同じ日付に対しては 1 回しか発火しない。
//! - `shutdown_tx` を drop / send するとループが止まる
//! - `shutdown_and_join()` で終了を待てる

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::orchestrator::TaskOrchestrator;
use crate::domain::DayOfMonthTrigger;

pub struct CronLoop {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl CronLoop {
    /// Spawn the loop. The first check happens immediately.
    pub fn spawn(
        orchestrator: Arc<TaskOrchestrator>,
        trigger: DayOfMonthTrigger,
        poll_interval: Duration,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(cron_loop(orchestrator, trigger, poll_interval, shutdown_rx));
        Self { shutdown_tx, join }
    }

    /// Stop polling. A run already started is not cancelled.
    pub fn request_shutdown(&self) {
        // receiver may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        if let Err(e) = self.join.await {
            warn!(error = %e, "cron loop terminated abnormally");
        }
    }
}

async fn cron_loop(
    orchestrator: Arc<TaskOrchestrator>,
    trigger: DayOfMonthTrigger,
    poll_interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(day = trigger.day(), ?poll_interval, "cron loop started");
    let mut last_fired: Option<NaiveDate> = None;
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let today = orchestrator.clock().today();
        if last_fired == Some(today) || !trigger.is_due(today) {
            debug!(%today, "cron tick: nothing due");
            continue;
        }

        if let Some(handle) = orchestrator.trigger_if_due(trigger) {
            last_fired = Some(today);
            match handle.await {
                Ok(result) if result.is_busy_rejection() => {
                    // another task held the gate; try again next tick
                    last_fired = None;
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "scheduled block task did not finish"),
            }
        }
    }
    info!("cron loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::OrchestratorBuilder;
    use crate::ports::FixedClock;
    use crate::testing::{ScriptedRouter, ScriptedStore, instant};

    fn orchestrator(clock: Arc<FixedClock>, router: Arc<ScriptedRouter>) -> Arc<TaskOrchestrator> {
        Arc::new(
            OrchestratorBuilder::new()
                .router(router)
                .persistence(Arc::new(ScriptedStore::reporting("ok")))
                .clock(clock)
                .build()
                .unwrap(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_due_day() {
        let clock = Arc::new(FixedClock::new(instant(2024, 5, 20)));
        let router = Arc::new(ScriptedRouter::healthy());
        let o = orchestrator(clock.clone(), router.clone());

        let cron = CronLoop::spawn(o.clone(), DayOfMonthTrigger::BILLING_DAY, Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(60 * 5 + 1)).await;
        assert_eq!(router.block_calls(), 1);

        clock.set(instant(2024, 5, 21));
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(router.block_calls(), 1);

        clock.set(instant(2024, 6, 20));
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(router.block_calls(), 2);

        cron.shutdown_and_join().await;
        assert_eq!(o.task_history().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_loop() {
        let clock = Arc::new(FixedClock::new(instant(2024, 5, 2)));
        let router = Arc::new(ScriptedRouter::healthy());
        let o = orchestrator(clock.clone(), router.clone());

        let cron = CronLoop::spawn(o, DayOfMonthTrigger::BILLING_DAY, Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(1)).await;
        cron.shutdown_and_join().await;

        clock.set(instant(2024, 5, 20));
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(router.block_calls(), 0);
    }
}
