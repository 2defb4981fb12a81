//! Errors - コラボレーターとタスク本体のエラー型

use thiserror::Error;

/// Failures reported by a router client.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("router {host} unreachable after {attempts} attempts")]
    Unreachable { host: String, attempts: u32 },

    #[error("router is not connected")]
    NotConnected,

    #[error("router protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Failures reported by a persistence client.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid record: {0}")]
    Invalid(String),

    #[error("database error: {0}")]
    Backend(String),
}

/// Why a task body could not produce an outcome.
///
/// Converted into a failed `TaskResult` at the orchestrator boundary; never
/// returned to callers of the `run_*` methods.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Failed to connect to router")]
    Connection,

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The runtime cancelled the task before it produced an outcome.
    #[error("task was interrupted before it finished")]
    Interrupted,
}
