//! InMemoryStore - 開発用の請求データベース
//!
//! 本番の DB クライアントと同じ `PersistenceClient` を実装する。
//! プロセス内のみ（再起動で消える）。

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use ulid::Ulid;

use crate::domain::{
    Client, ClientStatus, Lease, NewPayment, Payment, PaymentStatus, PersistenceError,
    SyncedLease,
};
use crate::ports::{Clock, PersistenceClient};

#[derive(Default)]
struct StoreState {
    clients: BTreeMap<String, Client>,
    payments: BTreeMap<String, Payment>,
    leases: BTreeMap<String, SyncedLease>,
    /// When set, every call fails with this reason.
    outage: Option<String>,
}

impl StoreState {
    fn check_available(&self) -> Result<(), PersistenceError> {
        match &self.outage {
            Some(reason) => Err(PersistenceError::Backend(reason.clone())),
            None => Ok(()),
        }
    }
}

pub struct InMemoryStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
        }
    }

    /// Insert or replace a client as-is.
    pub async fn insert_client(&self, client: Client) {
        self.state.lock().await.clients.insert(client.id.clone(), client);
    }

    /// Insert or replace a payment, keeping its id.
    pub async fn insert_payment(&self, payment: Payment) {
        self.state.lock().await.payments.insert(payment.id.clone(), payment);
    }

    /// Make every subsequent call fail (`Some`) or recover (`None`).
    pub async fn set_outage(&self, reason: Option<String>) {
        self.state.lock().await.outage = reason;
    }

    fn next_payment_id(&self) -> String {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random()).to_string()
    }

    async fn suspend_overdue_clients(&self) -> Result<usize, PersistenceError> {
        // due dates are compared against the UTC calendar date
        let today = self.clock.now().date_naive();
        let mut state = self.state.lock().await;
        state.check_available()?;

        let overdue: BTreeSet<String> = state
            .payments
            .values()
            .filter(|p| p.status == PaymentStatus::Pending && p.due_date < today)
            .map(|p| p.client_id.clone())
            .collect();

        for client_id in &overdue {
            if let Some(client) = state.clients.get_mut(client_id) {
                client.status = ClientStatus::Suspended;
            }
        }
        Ok(overdue.len())
    }
}

#[async_trait]
impl PersistenceClient for InMemoryStore {
    async fn get_clients(&self) -> Result<Vec<Client>, PersistenceError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.clients.values().cloned().collect())
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<Client>, PersistenceError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.clients.get(client_id).cloned())
    }

    async fn get_payments(&self, client_id: Option<&str>) -> Result<Vec<Payment>, PersistenceError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .payments
            .values()
            .filter(|p| client_id.is_none_or(|id| p.client_id == id))
            .cloned()
            .collect())
    }

    async fn record_payment(&self, payment: NewPayment) -> Result<Payment, PersistenceError> {
        if payment.amount == 0 {
            return Err(PersistenceError::Invalid("payment amount must be positive".into()));
        }
        let id = self.next_payment_id();
        let mut state = self.state.lock().await;
        state.check_available()?;
        if !state.clients.contains_key(&payment.client_id) {
            return Err(PersistenceError::NotFound {
                kind: "client",
                id: payment.client_id,
            });
        }

        let payment = payment.into_payment(id);
        info!(payment = %payment.id, client = %payment.client_id, amount = payment.amount, "payment recorded");
        state.payments.insert(payment.id.clone(), payment.clone());
        Ok(payment)
    }

    async fn update_payment_status(
        &self,
        payment_id: &str,
        status: PaymentStatus,
    ) -> Result<bool, PersistenceError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        let Some(payment) = state.payments.get_mut(payment_id) else {
            return Ok(false);
        };
        payment.status = status;
        debug!(payment = payment_id, ?status, "payment status updated");
        Ok(true)
    }

    async fn update_client_status(
        &self,
        client_id: &str,
        status: ClientStatus,
    ) -> Result<bool, PersistenceError> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        let Some(client) = state.clients.get_mut(client_id) else {
            return Ok(false);
        };
        client.status = status;
        debug!(client = client_id, ?status, "client status updated");
        Ok(true)
    }

    async fn sync_leases(&self, leases: &[Lease]) -> Result<usize, PersistenceError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        state.check_available()?;
        for lease in leases {
            state.leases.insert(
                lease.id.clone(),
                SyncedLease {
                    lease: lease.clone(),
                    last_synced: now,
                },
            );
        }
        info!(count = leases.len(), "leases synchronized with the database");
        Ok(leases.len())
    }

    async fn get_synced_leases(&self) -> Result<Vec<SyncedLease>, PersistenceError> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.leases.values().cloned().collect())
    }

    async fn run_overdue_payment_check(&self) -> String {
        match self.suspend_overdue_clients().await {
            Ok(0) => "No clients with overdue payments found.".to_string(),
            Ok(n) => format!("Successfully processed {n} clients with overdue payments."),
            Err(e) => {
                error!(error = %e, "overdue payment check failed");
                format!("ERROR: Failed to process overdue payments: {e}")
            }
        }
    }
}
