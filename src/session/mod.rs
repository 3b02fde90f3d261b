//! Session history persistence.
//!
//! Finished sessions are saved by [`SessionRecorder`], a timer subscriber, into
//! a [`SessionStore`]. The `history` command reads them back.

mod error;
mod recorder;
mod store;

pub use error::StoreError;
pub use recorder::SessionRecorder;
pub use store::{JsonFileStore, MemoryStore, SessionRecord, SessionStore, SESSIONS_FILE_NAME};
