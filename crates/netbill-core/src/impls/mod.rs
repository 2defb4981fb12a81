//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryRouter**: リース表を持つシミュレーションルーター
//! - **InMemoryStore**: プロセス内の請求データベース
//! - **TracingEventSink / NoopEventSink**: タスク完了通知
//!
//! 本番の RouterOS クライアントや DB クライアントは同じ trait を実装して
//! 差し替える。

pub mod event_sink;
pub mod inmem_router;
pub mod inmem_store;

pub use self::event_sink::{NoopEventSink, TracingEventSink};
pub use self::inmem_router::{InMemoryRouter, RouterConfig, demo_leases};
pub use self::inmem_store::InMemoryStore;
