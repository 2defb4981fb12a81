//! RouterClient port - DHCP ルーター（MikroTik RouterOS）への操作
//!
//! オーケストレーターが使うのは `connect` / `block_unpaid_clients` /
//! `sync_leases_to_database` のみ。残りはダッシュボードのリース画面用。

use async_trait::async_trait;

use crate::domain::{BlockReport, Lease, RouterError};

/// Operations against the router that hands out subscriber leases.
///
/// # Thread Safety
/// - `Send + Sync` を要求（orchestrator から `Arc<dyn RouterClient>` で共有）
#[async_trait]
pub trait RouterClient: Send + Sync {
    /// Open (or reopen) the API session. Retries live inside the client;
    /// `Ok(false)` means every attempt failed.
    async fn connect(&self) -> Result<bool, RouterError>;

    async fn close_connection(&self);

    fn is_connected(&self) -> bool;

    async fn get_leases(&self) -> Result<Vec<Lease>, RouterError>;

    /// `Ok(false)` when the lease id is unknown to the router.
    async fn block_client(&self, lease_id: &str) -> Result<bool, RouterError>;

    async fn unblock_client(&self, lease_id: &str) -> Result<bool, RouterError>;

    /// `bandwidth` uses router rate-limit notation (`10M/5M`).
    async fn set_bandwidth(&self, lease_id: &str, bandwidth: &str) -> Result<bool, RouterError>;

    /// Mirror the router's lease table into the billing database.
    async fn sync_leases_to_database(&self) -> Result<bool, RouterError>;

    /// Block the lease of every subscriber marked unpaid.
    async fn block_unpaid_clients(&self) -> Result<BlockReport, RouterError>;
}
