//! EventSink port - タスク完了の通知
//!
//! ダッシュボードのトースト表示などに相当する。オーケストレーターは履歴に
//! 記録した結果ごとに 1 回だけ呼ぶ（busy で弾いた呼び出しは通知しない）。

use crate::domain::TaskResult;

pub trait TaskEventSink: Send + Sync {
    fn task_finished(&self, result: &TaskResult);
}
