//! Persists each finished session and tracks the stored session count.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{error, info, warn};

use super::store::SessionStore;
use crate::timer::{Channel, SessionTimer, Subscriber, WeakSessionTimer};
use crate::types::Snapshot;

/// Snapshot subscriber that saves the ledger when a session completes.
///
/// Holds only a weak handle to the timer. Store failures are logged and never
/// touch the timer.
pub struct SessionRecorder {
    timer: WeakSessionTimer,
    store: Box<dyn SessionStore>,
    count: Channel<usize>,
    was_done: Cell<bool>,
}

impl SessionRecorder {
    /// Creates a recorder and subscribes it to `timer`.
    pub fn attach(timer: &SessionTimer, store: impl SessionStore + 'static) -> Rc<Self> {
        let recorder = Rc::new(Self::new(timer, store));
        timer.subscribe(Rc::clone(&recorder) as Rc<dyn Subscriber<Snapshot>>);
        recorder
    }

    /// Creates a detached recorder. The count starts from the stored sessions.
    pub fn new(timer: &SessionTimer, store: impl SessionStore + 'static) -> Self {
        let initial = match store.load_all() {
            Ok(records) => records.len(),
            Err(e) => {
                warn!("Failed to load session history: {}", e);
                0
            }
        };

        Self {
            timer: timer.downgrade(),
            store: Box::new(store),
            count: Channel::new(initial),
            was_done: Cell::new(timer.snapshot().done),
        }
    }

    /// Number of stored sessions.
    pub fn session_count(&self) -> usize {
        self.count.state()
    }

    /// Subscribes to session count changes.
    pub fn subscribe_count(&self, subscriber: Rc<dyn Subscriber<usize>>) -> bool {
        self.count.attach(subscriber)
    }

    /// Re-reads the count from the store.
    pub fn refresh_count(&self) {
        match self.store.load_all() {
            Ok(records) => self.count.set_state(records.len()),
            Err(e) => warn!("Failed to refresh session count: {}", e),
        }
    }

    fn persist(&self) {
        let Some(timer) = self.timer.upgrade() else {
            warn!("Session finished but the timer is gone");
            return;
        };

        let Some(timestamps) = timer.finished_timestamps() else {
            warn!("Session finished but no closed ledger is available");
            return;
        };

        match self.store.save(&timestamps) {
            Ok(record) => {
                info!(
                    "Session {} saved ({} min focused)",
                    record.id,
                    record.focused_ms() / 60_000
                );
                self.refresh_count();
            }
            Err(e) => error!("Failed to save session: {} ({})", e, e.suggestion()),
        }
    }
}

impl Subscriber<Snapshot> for SessionRecorder {
    fn update(&self, snapshot: &Snapshot) {
        let was_done = self.was_done.replace(snapshot.done);
        if snapshot.done && !was_done {
            self.persist();
        }
    }
}
