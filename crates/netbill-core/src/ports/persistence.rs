//! PersistenceClient port - 請求データベースへのアクセス

use async_trait::async_trait;

use crate::domain::{
    Client, ClientStatus, Lease, NewPayment, Payment, PaymentStatus, PersistenceError,
    SyncedLease,
};

/// Storage for subscribers, payments and mirrored leases.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    async fn get_clients(&self) -> Result<Vec<Client>, PersistenceError>;

    async fn get_client(&self, client_id: &str) -> Result<Option<Client>, PersistenceError>;

    /// All payments, or only those of `client_id`.
    async fn get_payments(&self, client_id: Option<&str>) -> Result<Vec<Payment>, PersistenceError>;

    async fn record_payment(&self, payment: NewPayment) -> Result<Payment, PersistenceError>;

    /// `Ok(false)` when no payment has that id.
    async fn update_payment_status(
        &self,
        payment_id: &str,
        status: PaymentStatus,
    ) -> Result<bool, PersistenceError>;

    /// `Ok(false)` when no client has that id.
    async fn update_client_status(
        &self,
        client_id: &str,
        status: ClientStatus,
    ) -> Result<bool, PersistenceError>;

    /// Upsert leases by id; returns how many rows were written.
    async fn sync_leases(&self, leases: &[Lease]) -> Result<usize, PersistenceError>;

    async fn get_synced_leases(&self) -> Result<Vec<SyncedLease>, PersistenceError>;

    /// Suspend every client with a pending payment past its due date.
    ///
    /// Always answers with a report line; a failed sweep is reported as a line
    /// starting with `ERROR:` rather than as an `Err`.
    async fn run_overdue_payment_check(&self) -> String;
}
