//! RunGate - 同時に 1 タスクだけを通すゲート
//!
//! キューイングはしない。保持中の `try_acquire` は即座に `None` を返す。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct RunGate {
    running: AtomicBool,
}

impl RunGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate if it is free. The returned guard releases it on drop,
    /// including when the holder unwinds. The guard owns a handle to the
    /// gate so it can be moved into a spawned task.
    pub fn try_acquire(self: &Arc<Self>) -> Option<RunGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard {
                gate: Arc::clone(self),
            })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

#[must_use = "the gate is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct RunGuard {
    gate: Arc<RunGate>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.gate.running.store(false, Ordering::Release);
    }
}
