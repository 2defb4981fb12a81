//! InMemoryRouter - 開発用のシミュレーションルーター
//!
//! RouterOS API の代わりにプロセス内のリース表を操作する。接続の再試行と
//! バックオフは本物のクライアントと同じ流れで動く。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::domain::{BlockReport, ClientStatus, Lease, LeaseStatus, RetryPolicy, RouterError};
use crate::ports::{PersistenceClient, RouterClient};

/// Connection settings for a RouterOS API endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Per-attempt connect timeout.
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            host: "192.168.88.1".to_string(),
            port: 8728,
            username: "admin".to_string(),
            password: String::new(),
            timeout: Duration::from_secs(5),
            retry: RetryPolicy::router_default(),
        }
    }
}

/// Leases the simulator starts with.
pub fn demo_leases() -> Vec<Lease> {
    vec![
        Lease {
            id: "*1".to_string(),
            address: "192.168.1.100".to_string(),
            mac_address: "00:1A:2B:3C:4D:5E".to_string(),
            client_id: "01:00:1A:2B:3C:4D:5E".to_string(),
            hostname: "client-laptop".to_string(),
            status: LeaseStatus::Active,
            expiry_date: "7d".to_string(),
            bandwidth: "10M/5M".to_string(),
        },
        Lease {
            id: "*2".to_string(),
            address: "192.168.1.101".to_string(),
            mac_address: "11:22:33:44:55:66".to_string(),
            client_id: "01:11:22:33:44:55:66".to_string(),
            hostname: "android-phone".to_string(),
            status: LeaseStatus::Active,
            expiry_date: "14d".to_string(),
            bandwidth: "5M/2M".to_string(),
        },
        Lease {
            id: "*3".to_string(),
            address: "192.168.1.102".to_string(),
            mac_address: "AA:BB:CC:DD:EE:FF".to_string(),
            client_id: "01:AA:BB:CC:DD:EE:FF".to_string(),
            hostname: "smart-tv".to_string(),
            status: LeaseStatus::Blocked,
            expiry_date: "0s".to_string(),
            bandwidth: "20M/10M".to_string(),
        },
    ]
}

pub struct InMemoryRouter {
    config: RouterConfig,
    persistence: Arc<dyn PersistenceClient>,
    leases: Mutex<Vec<Lease>>,
    connected: AtomicBool,
    reachable: AtomicBool,
    /// Connection attempts still to fail before one succeeds.
    failing_attempts: AtomicU32,
    /// Simulated handshake latency, `ZERO` by default.
    latency: std::sync::Mutex<Duration>,
    attempts: AtomicU32,
}

impl InMemoryRouter {
    pub fn new(config: RouterConfig, persistence: Arc<dyn PersistenceClient>) -> Self {
        Self::with_leases(config, persistence, demo_leases())
    }

    pub fn with_leases(
        config: RouterConfig,
        persistence: Arc<dyn PersistenceClient>,
        leases: Vec<Lease>,
    ) -> Self {
        Self {
            config,
            persistence,
            leases: Mutex::new(leases),
            connected: AtomicBool::new(false),
            reachable: AtomicBool::new(true),
            failing_attempts: AtomicU32::new(0),
            latency: std::sync::Mutex::new(Duration::ZERO),
            attempts: AtomicU32::new(0),
        }
    }

    /// Unreachable routers refuse every connection attempt; also drops the
    /// current session.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
        if !reachable {
            self.connected.store(false, Ordering::SeqCst);
        }
    }

    pub fn fail_next_attempts(&self, n: u32) {
        self.failing_attempts.store(n, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap_or_else(|e| e.into_inner()) = latency;
    }

    /// Total connection attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    async fn open_session(&self) -> Result<(), RouterError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock().unwrap_or_else(|e| e.into_inner());
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if !self.reachable.load(Ordering::SeqCst) {
            return Err(RouterError::Protocol(format!(
                "no route to {}:{}",
                self.config.host, self.config.port
            )));
        }
        let failed = self
            .failing_attempts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(RouterError::Protocol("connection refused".into()));
        }
        Ok(())
    }

    async fn ensure_connected(&self) -> Result<(), RouterError> {
        if self.is_connected() || self.connect().await? {
            Ok(())
        } else {
            Err(RouterError::NotConnected)
        }
    }

    async fn update_lease<F>(&self, lease_id: &str, op: &str, apply: F) -> Result<bool, RouterError>
    where
        F: FnOnce(&mut Lease),
    {
        self.ensure_connected().await?;
        let mut leases = self.leases.lock().await;
        match leases.iter_mut().find(|l| l.id == lease_id) {
            Some(lease) => {
                apply(lease);
                info!(lease = lease_id, op, "lease updated");
                Ok(true)
            }
            None => {
                warn!(lease = lease_id, op, "lease not found");
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl RouterClient for InMemoryRouter {
    async fn connect(&self) -> Result<bool, RouterError> {
        let retry = &self.config.retry;
        info!(host = %self.config.host, port = self.config.port, "connecting to router");

        for attempt in 0..=retry.max_retries {
            if attempt > 0 {
                let delay = retry.next_delay(attempt);
                info!(attempt, max_retries = retry.max_retries, ?delay, "retrying router connection");
                tokio::time::sleep(delay).await;
            }

            let outcome = match tokio::time::timeout(self.config.timeout, self.open_session()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(RouterError::Protocol(format!(
                    "timed out after {:?}",
                    self.config.timeout
                ))),
            };
            match outcome {
                Ok(()) => {
                    self.connected.store(true, Ordering::SeqCst);
                    info!(host = %self.config.host, "connected to router");
                    return Ok(true);
                }
                Err(e) => warn!(host = %self.config.host, attempt, error = %e, "router connection failed"),
            }
        }

        self.connected.store(false, Ordering::SeqCst);
        error!(
            host = %self.config.host,
            attempts = retry.max_retries + 1,
            "giving up on router connection"
        );
        Ok(false)
    }

    async fn close_connection(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            info!(host = %self.config.host, "router connection closed");
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn get_leases(&self) -> Result<Vec<Lease>, RouterError> {
        self.ensure_connected().await?;
        Ok(self.leases.lock().await.clone())
    }

    async fn block_client(&self, lease_id: &str) -> Result<bool, RouterError> {
        self.update_lease(lease_id, "block", |l| l.status = LeaseStatus::Blocked)
            .await
    }

    async fn unblock_client(&self, lease_id: &str) -> Result<bool, RouterError> {
        self.update_lease(lease_id, "unblock", |l| l.status = LeaseStatus::Active)
            .await
    }

    async fn set_bandwidth(&self, lease_id: &str, bandwidth: &str) -> Result<bool, RouterError> {
        let bandwidth = bandwidth.to_string();
        self.update_lease(lease_id, "set-bandwidth", move |l| l.bandwidth = bandwidth)
            .await
    }

    async fn sync_leases_to_database(&self) -> Result<bool, RouterError> {
        if !self.is_connected() {
            return Err(RouterError::NotConnected);
        }
        let leases = self.leases.lock().await.clone();
        match self.persistence.sync_leases(&leases).await {
            Ok(count) => {
                info!(count, "lease table mirrored to database");
                Ok(true)
            }
            Err(e) => {
                error!(error = %e, "failed to mirror lease table");
                Ok(false)
            }
        }
    }

    async fn block_unpaid_clients(&self) -> Result<BlockReport, RouterError> {
        if !self.is_connected() {
            return Err(RouterError::NotConnected);
        }
        let clients = match self.persistence.get_clients().await {
            Ok(clients) => clients,
            Err(e) => {
                error!(error = %e, "could not load clients to block");
                return Ok(BlockReport::failed(e.to_string()));
            }
        };

        let mut leases = self.leases.lock().await;
        let mut blocked = 0;
        for client in clients.iter().filter(|c| c.status == ClientStatus::Suspended) {
            let Some(lease_id) = client.lease_id.as_deref() else {
                continue;
            };
            if let Some(lease) = leases.iter_mut().find(|l| l.id == lease_id)
                && lease.status != LeaseStatus::Blocked
            {
                lease.status = LeaseStatus::Blocked;
                blocked += 1;
                info!(client = %client.id, lease = lease_id, "blocked unpaid client");
            }
        }
        Ok(BlockReport::blocked(blocked))
    }
}
