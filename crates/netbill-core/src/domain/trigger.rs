//! DayOfMonthTrigger - 月次の起動日判定
//!
//! 純粋関数として実装（日付を受け取って判定するだけ）。現在日付の取得は
//! Clock port の責務。

use chrono::{Datelike, NaiveDate};

/// Fires on one calendar day of every month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayOfMonthTrigger {
    day: u32,
}

impl DayOfMonthTrigger {
    /// Day unpaid subscribers get cut off.
    pub const BILLING_DAY: DayOfMonthTrigger = DayOfMonthTrigger { day: 20 };

    /// Returns `None` unless `1 <= day <= 31`.
    pub fn new(day: u32) -> Option<Self> {
        (1..=31).contains(&day).then_some(Self { day })
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Months shorter than `day` never fire (no clamping to month end).
    pub fn is_due(&self, date: NaiveDate) -> bool {
        date.day() == self.day
    }
}

impl Default for DayOfMonthTrigger {
    fn default() -> Self {
        Self::BILLING_DAY
    }
}
