//! netbill-core
//!
//! ISP 請求ダッシュボードのメンテナンスタスク実行基盤。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（task_name, result, history, last_run, records, retry, trigger, errors）
//! - **ports**: 抽象化レイヤー（RouterClient, PersistenceClient, Clock, TaskEventSink）
//! - **app**: アプリケーションロジック（builder, orchestrator, gate, cron_loop, status）
//! - **impls**: 実装（InMemoryRouter, InMemoryStore など開発用）
//! - **config**: TOML 設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{CronLoop, OrchestratorBuilder, StatusReport, TaskOrchestrator};
pub use config::AppConfig;
pub use domain::{TaskName, TaskResult};
