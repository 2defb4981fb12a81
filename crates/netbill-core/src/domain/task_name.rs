//! TaskName - メンテナンスタスクの識別子
//!
//! タスクは固定の 3 種類のみ。文字列ではなく enum で持つことで
//! 未知のタスク名をコンパイル時に排除する。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the named maintenance tasks the orchestrator can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskName {
    BlockUnpaidClients,
    SyncLeases,
    CheckPayments,
}

impl TaskName {
    pub const ALL: [TaskName; 3] = [
        TaskName::BlockUnpaidClients,
        TaskName::SyncLeases,
        TaskName::CheckPayments,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskName::BlockUnpaidClients => "block-unpaid-clients",
            TaskName::SyncLeases => "sync-leases",
            TaskName::CheckPayments => "check-payments",
        }
    }

    /// Human readable label for dashboards.
    pub fn title(self) -> &'static str {
        match self {
            TaskName::BlockUnpaidClients => "Block Unpaid Clients",
            TaskName::SyncLeases => "Sync Mikrotik Leases",
            TaskName::CheckPayments => "Check Payments",
        }
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task name: {0}")]
pub struct ParseTaskNameError(pub String);

impl FromStr for TaskName {
    type Err = ParseTaskNameError;

    /// Accepts the kebab-case names and the older camelCase spelling
    /// (`blockUnpaidClients`) still used by dashboard bookmarks.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "block-unpaid-clients" | "blockUnpaidClients" => Ok(TaskName::BlockUnpaidClients),
            "sync-leases" | "syncLeases" => Ok(TaskName::SyncLeases),
            "check-payments" | "checkPayments" => Ok(TaskName::CheckPayments),
            other => Err(ParseTaskNameError(other.to_string())),
        }
    }
}
