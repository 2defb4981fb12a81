//! Scripted collaborators for orchestrator tests.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    BlockReport, Client, ClientStatus, Lease, NewPayment, Payment, PaymentStatus,
    PersistenceError, RouterError, SyncedLease, TaskResult,
};
use crate::ports::{PersistenceClient, RouterClient, TaskEventSink};

pub(crate) fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
}

/// Counts how many collaborator calls are in flight at once.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    current: AtomicUsize,
    max: AtomicUsize,
}

impl InFlight {
    pub(crate) async fn enter(&self, delay: Duration) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn max(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }
}

pub(crate) struct ScriptedRouter {
    pub(crate) connect_ok: AtomicBool,
    pub(crate) connect_error: Mutex<Option<String>>,
    pub(crate) block_report: Mutex<Result<BlockReport, String>>,
    pub(crate) sync_result: Mutex<Result<bool, String>>,
    pub(crate) delay: Duration,
    pub(crate) in_flight: Arc<InFlight>,
    pub(crate) connect_calls: AtomicU32,
    pub(crate) block_calls: AtomicU32,
    pub(crate) sync_calls: AtomicU32,
}

impl ScriptedRouter {
    pub(crate) fn healthy() -> Self {
        Self {
            connect_ok: AtomicBool::new(true),
            connect_error: Mutex::new(None),
            block_report: Mutex::new(Ok(BlockReport::blocked(2))),
            sync_result: Mutex::new(Ok(true)),
            delay: Duration::ZERO,
            in_flight: Arc::new(InFlight::default()),
            connect_calls: AtomicU32::new(0),
            block_calls: AtomicU32::new(0),
            sync_calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn slow(delay: Duration, in_flight: Arc<InFlight>) -> Self {
        Self {
            delay,
            in_flight,
            ..Self::healthy()
        }
    }

    pub(crate) fn unreachable() -> Self {
        let router = Self::healthy();
        router.connect_ok.store(false, Ordering::SeqCst);
        router
    }

    pub(crate) fn set_block_report(&self, report: Result<BlockReport, String>) {
        *self.block_report.lock().unwrap() = report;
    }

    pub(crate) fn set_sync_result(&self, result: Result<bool, String>) {
        *self.sync_result.lock().unwrap() = result;
    }

    pub(crate) fn block_calls(&self) -> u32 {
        self.block_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RouterClient for ScriptedRouter {
    async fn connect(&self) -> Result<bool, RouterError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight.enter(self.delay).await;
        if let Some(msg) = self.connect_error.lock().unwrap().clone() {
            return Err(RouterError::Protocol(msg));
        }
        Ok(self.connect_ok.load(Ordering::SeqCst))
    }

    async fn close_connection(&self) {}

    fn is_connected(&self) -> bool {
        self.connect_ok.load(Ordering::SeqCst)
    }

    async fn get_leases(&self) -> Result<Vec<Lease>, RouterError> {
        Ok(Vec::new())
    }

    async fn block_client(&self, _lease_id: &str) -> Result<bool, RouterError> {
        Ok(true)
    }

    async fn unblock_client(&self, _lease_id: &str) -> Result<bool, RouterError> {
        Ok(true)
    }

    async fn set_bandwidth(&self, _lease_id: &str, _bandwidth: &str) -> Result<bool, RouterError> {
        Ok(true)
    }

    async fn sync_leases_to_database(&self) -> Result<bool, RouterError> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight.enter(self.delay).await;
        self.sync_result
            .lock()
            .unwrap()
            .clone()
            .map_err(RouterError::Protocol)
    }

    async fn block_unpaid_clients(&self) -> Result<BlockReport, RouterError> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight.enter(self.delay).await;
        self.block_report
            .lock()
            .unwrap()
            .clone()
            .map_err(RouterError::Protocol)
    }
}

/// Store whose overdue sweep answers with a fixed report line.
pub(crate) struct ScriptedStore {
    pub(crate) overdue_report: Mutex<String>,
    pub(crate) delay: Duration,
    pub(crate) in_flight: Arc<InFlight>,
    pub(crate) sweep_calls: AtomicU32,
}

impl ScriptedStore {
    pub(crate) fn reporting(report: &str) -> Self {
        Self {
            overdue_report: Mutex::new(report.to_string()),
            delay: Duration::ZERO,
            in_flight: Arc::new(InFlight::default()),
            sweep_calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn slow(report: &str, delay: Duration, in_flight: Arc<InFlight>) -> Self {
        Self {
            delay,
            in_flight,
            ..Self::reporting(report)
        }
    }
}

#[async_trait]
impl PersistenceClient for ScriptedStore {
    async fn get_clients(&self) -> Result<Vec<Client>, PersistenceError> {
        Ok(Vec::new())
    }

    async fn get_client(&self, _client_id: &str) -> Result<Option<Client>, PersistenceError> {
        Ok(None)
    }

    async fn get_payments(&self, _client_id: Option<&str>) -> Result<Vec<Payment>, PersistenceError> {
        Ok(Vec::new())
    }

    async fn record_payment(&self, payment: NewPayment) -> Result<Payment, PersistenceError> {
        Ok(payment.into_payment("p-test".to_string()))
    }

    async fn update_payment_status(
        &self,
        _payment_id: &str,
        _status: PaymentStatus,
    ) -> Result<bool, PersistenceError> {
        Ok(false)
    }

    async fn update_client_status(
        &self,
        _client_id: &str,
        _status: ClientStatus,
    ) -> Result<bool, PersistenceError> {
        Ok(false)
    }

    async fn sync_leases(&self, leases: &[Lease]) -> Result<usize, PersistenceError> {
        Ok(leases.len())
    }

    async fn get_synced_leases(&self) -> Result<Vec<SyncedLease>, PersistenceError> {
        Ok(Vec::new())
    }

    async fn run_overdue_payment_check(&self) -> String {
        self.sweep_calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight.enter(self.delay).await;
        self.overdue_report.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    pub(crate) seen: Mutex<Vec<TaskResult>>,
}

impl RecordingSink {
    pub(crate) fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl TaskEventSink for RecordingSink {
    fn task_finished(&self, result: &TaskResult) {
        self.seen.lock().unwrap().push(result.clone());
    }
}
