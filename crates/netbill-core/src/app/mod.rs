//! App - アプリケーション層
//!
//! ports を組み合わせてタスク実行を組み立てる。
//!
//! # 主要コンポーネント
//! - **OrchestratorBuilder**: コラボレーターの注入
//! - **TaskOrchestrator**: ゲート・実行・記録
//! - **CronLoop**: 月次トリガーの定期チェック
//! - **StatusReport**: ダッシュボード用スナップショット

pub mod builder;
pub mod cron_loop;
pub mod gate;
pub mod orchestrator;
pub mod status;

pub use self::builder::{BuildError, OrchestratorBuilder};
pub use self::cron_loop::CronLoop;
pub use self::gate::{RunGate, RunGuard};
pub use self::orchestrator::TaskOrchestrator;
pub use self::status::{StatusReport, TaskStatus, format_time_since};
