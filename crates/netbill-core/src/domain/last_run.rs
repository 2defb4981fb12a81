//! Last-run bookkeeping per task.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::task_name::TaskName;

/// Epoch-millisecond value meaning "this task has never completed a run".
pub const NEVER: i64 = 0;

/// Task name -> epoch millis of its most recent executed (non-rejected) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastRunTimes {
    times: BTreeMap<TaskName, i64>,
}

impl LastRunTimes {
    pub fn new() -> Self {
        Self {
            times: TaskName::ALL.iter().map(|&name| (name, NEVER)).collect(),
        }
    }

    pub fn record(&mut self, name: TaskName, at: DateTime<Utc>) {
        self.times.insert(name, at.timestamp_millis());
    }

    pub fn get(&self, name: TaskName) -> i64 {
        self.times.get(&name).copied().unwrap_or(NEVER)
    }

    pub fn has_run(&self, name: TaskName) -> bool {
        self.get(name) != NEVER
    }

    pub fn snapshot(&self) -> BTreeMap<TaskName, i64> {
        self.times.clone()
    }
}

impl Default for LastRunTimes {
    fn default() -> Self {
        Self::new()
    }
}
