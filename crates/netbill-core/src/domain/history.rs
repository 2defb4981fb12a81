//! History - 直近のタスク結果（新しい順、件数上限付き）

use std::collections::VecDeque;

use super::result::TaskResult;

pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Bounded, newest-first log of task results.
///
/// Insertion happens at the head; once `capacity` is exceeded the oldest
/// entry (the tail) is evicted.
#[derive(Debug, Clone)]
pub struct TaskHistory {
    entries: VecDeque<TaskResult>,
    capacity: usize,
}

impl TaskHistory {
    /// `capacity` is clamped to at least one entry.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, result: TaskResult) {
        self.entries.push_front(result);
        self.entries.truncate(self.capacity);
    }

    /// Owned copy, newest first.
    pub fn snapshot(&self) -> Vec<TaskResult> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&TaskResult> {
        self.entries.front()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TaskHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskName, TaskOutcome};
    use chrono::{TimeZone, Utc};

    fn result(n: usize) -> TaskResult {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::seconds(n as i64);
        TaskResult::from_outcome(TaskName::SyncLeases, TaskOutcome::success(format!("run {n}")), at)
    }

    #[test]
    fn newest_entry_is_first() {
        let mut h = TaskHistory::default();
        h.push(result(1));
        h.push(result(2));

        let snap = h.snapshot();
        assert_eq!(snap[0].message, "run 2");
        assert_eq!(snap[1].message, "run 1");
        assert_eq!(h.latest().unwrap().message, "run 2");
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut h = TaskHistory::default();
        for n in 1..=25 {
            h.push(result(n));
        }

        assert_eq!(h.len(), DEFAULT_HISTORY_CAPACITY);
        let snap = h.snapshot();
        assert_eq!(snap.first().unwrap().message, "run 25");
        assert_eq!(snap.last().unwrap().message, "run 6");
        assert!(snap.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut h = TaskHistory::with_capacity(0);
        h.push(result(1));
        h.push(result(2));
        assert_eq!(h.capacity(), 1);
        assert_eq!(h.snapshot()[0].message, "run 2");
    }
}
