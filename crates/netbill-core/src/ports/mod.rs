//! Ports - 抽象化レイヤー
//!
//! オーケストレーターが呼び出す外部コラボレーター（ルーター、請求 DB、
//! 時計、通知先）のインターフェース。実装は `impls` または呼び出し側が持つ。

pub mod clock;
pub mod event_sink;
pub mod persistence;
pub mod router;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::TaskEventSink;
pub use self::persistence::PersistenceClient;
pub use self::router::RouterClient;
