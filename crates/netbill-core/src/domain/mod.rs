//! Domain model (task names, results, history, collaborator records, ...).

pub mod errors;
pub mod history;
pub mod last_run;
pub mod records;
pub mod result;
pub mod retry;
pub mod task_name;
pub mod trigger;

pub use errors::{PersistenceError, RouterError, TaskError};
pub use history::{DEFAULT_HISTORY_CAPACITY, TaskHistory};
pub use last_run::{LastRunTimes, NEVER};
pub use records::{
    BlockReport, Client, ClientStatus, Lease, LeaseStatus, NewPayment, Payment, PaymentMethod,
    PaymentStatus, SyncedLease,
};
pub use result::{BUSY_MESSAGE, TaskOutcome, TaskResult};
pub use retry::{MAX_RETRY_DELAY, RetryPolicy};
pub use task_name::{ParseTaskNameError, TaskName};
pub use trigger::DayOfMonthTrigger;
