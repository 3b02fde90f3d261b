//! Session timer core.
//!
//! - [`ledger`]: alternating play/pause timestamps for one session
//! - [`channel`]: synchronous one-to-many state broadcast
//! - [`clock`] / [`scheduler`]: time and periodic-task capabilities
//! - [`engine`]: the state machine tying them together

pub mod channel;
pub mod clock;
pub mod engine;
pub mod ledger;
pub mod scheduler;

pub use channel::{observer, Channel, Observer, Subscriber};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{derive_snapshot, SessionTimer, WeakSessionTimer, TICK_INTERVAL};
pub use ledger::TimestampLedger;
pub use scheduler::{ManualScheduler, Scheduler, Task, TaskHandle, TokioScheduler};
