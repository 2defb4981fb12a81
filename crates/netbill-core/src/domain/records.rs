//! Records exchanged with the router and the billing database.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaseStatus {
    Active,
    Blocked,
    Expired,
}

/// A DHCP lease as reported by the router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    pub id: String,
    pub address: String,
    pub mac_address: String,
    pub client_id: String,
    pub hostname: String,
    pub status: LeaseStatus,
    /// Router supplied expiry, kept verbatim (`expires-after` or a date).
    pub expiry_date: String,
    /// Rate limit in router notation, e.g. `10M/5M`.
    pub bandwidth: String,
}

/// A lease row mirrored into the database by a sync run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncedLease {
    #[serde(flatten)]
    pub lease: Lease,
    pub last_synced: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Suspended,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    /// Router lease bound to this subscriber, if any.
    pub lease_id: Option<String>,
    pub plan: String,
    pub monthly_fee: u64,
    pub registration_date: NaiveDate,
    pub status: ClientStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "QRIS")]
    Qris,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "E-wallet")]
    EWallet,
    #[serde(rename = "Cash")]
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub client_id: String,
    pub amount: u64,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub method: PaymentMethod,
    pub reference: String,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A payment about to be recorded; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub client_id: String,
    pub amount: u64,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub method: PaymentMethod,
    pub reference: String,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewPayment {
    pub fn into_payment(self, id: String) -> Payment {
        Payment {
            id,
            client_id: self.client_id,
            amount: self.amount,
            date: self.date,
            due_date: self.due_date,
            method: self.method,
            reference: self.reference,
            status: self.status,
            notes: self.notes,
        }
    }
}

/// Aggregate answer of a "block unpaid clients" sweep on the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockReport {
    pub success: bool,
    pub blocked_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl BlockReport {
    pub fn blocked(blocked_count: u32) -> Self {
        Self {
            success: true,
            blocked_count,
            error_message: None,
        }
    }

    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            blocked_count: 0,
            error_message: Some(error_message.into()),
        }
    }
}
