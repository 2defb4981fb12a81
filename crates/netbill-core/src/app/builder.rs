//! OrchestratorBuilder - コラボレーターの注入とワイヤリング
//!
//! # Fail-fast 設計
//! - ルーターと請求 DB は必須。未設定なら build() が BuildError を返す
//! - Clock / EventSink は省略可能（SystemClock / NoopEventSink）

use std::sync::Arc;

use super::orchestrator::TaskOrchestrator;
use crate::domain::DEFAULT_HISTORY_CAPACITY;
use crate::impls::NoopEventSink;
use crate::ports::{Clock, PersistenceClient, RouterClient, SystemClock, TaskEventSink};

/// BuildError はオーケストレーター構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("router client is required but was not provided")]
    MissingRouter,

    #[error("persistence client is required but was not provided")]
    MissingPersistence,

    #[error("history capacity must be at least 1 (got {0})")]
    InvalidHistoryCapacity(usize),
}

/// # 使用例
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new()
///     .router(router)
///     .persistence(store)
///     .build()?;
/// ```
pub struct OrchestratorBuilder {
    router: Option<Arc<dyn RouterClient>>,
    persistence: Option<Arc<dyn PersistenceClient>>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn TaskEventSink>,
    history_capacity: usize,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            router: None,
            persistence: None,
            clock: Arc::new(SystemClock),
            events: Arc::new(NoopEventSink),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    pub fn router(mut self, router: Arc<dyn RouterClient>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn persistence(mut self, persistence: Arc<dyn PersistenceClient>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn event_sink(mut self, events: Arc<dyn TaskEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<TaskOrchestrator, BuildError> {
        let router = self.router.ok_or(BuildError::MissingRouter)?;
        let persistence = self.persistence.ok_or(BuildError::MissingPersistence)?;
        if self.history_capacity == 0 {
            return Err(BuildError::InvalidHistoryCapacity(self.history_capacity));
        }
        Ok(TaskOrchestrator::new(
            router,
            persistence,
            self.clock,
            self.events,
            self.history_capacity,
        ))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
