//! Periodic task scheduling.
//!
//! The engine never owns a timer loop of its own; it asks a [`Scheduler`] to
//! run a callback at a fixed interval and keeps the returned [`TaskHandle`]
//! for cancellation.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::clock::{Clock, ManualClock};
use crate::types::Timestamp;

/// Callback run on every tick.
pub type Task = Box<dyn FnMut()>;

/// Capability to run a callback periodically.
pub trait Scheduler {
    /// Runs `task` every `every`, starting one interval from now.
    fn schedule(&self, every: Duration, task: Task) -> TaskHandle;
}

/// Cancellation handle for a scheduled task.
///
/// Cancelling more than once is a no-op. Dropping the handle cancels the task.
pub struct TaskHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl TaskHandle {
    /// Wraps the scheduler-specific cancellation action.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stops the task from firing again.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Returns true once the task has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_none()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// ============================================================================
// TokioScheduler
// ============================================================================

/// Runs tasks on the current `LocalSet` with `tokio::time::interval`.
///
/// Must be used from within a `tokio::task::LocalSet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, every: Duration, mut task: Task) -> TaskHandle {
        let join = tokio::task::spawn_local(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                task();
            }
        });
        debug!("Periodic task scheduled every {:?}", every);

        TaskHandle::new(move || {
            join.abort();
            debug!("Periodic task cancelled");
        })
    }
}

// ============================================================================
// ManualScheduler
// ============================================================================

struct Entry {
    id: u64,
    every_ms: u64,
    next_fire: Timestamp,
    task: Option<Task>,
    cancelled: Rc<Cell<bool>>,
}

#[derive(Default)]
struct ManualState {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Deterministic scheduler driven together with a [`ManualClock`].
///
/// [`ManualScheduler::advance`] fires every due task in chronological order,
/// setting the clock to each firing time, then leaves the clock at the target.
/// Ticks missed because the clock was moved by hand fire once, at the current
/// time. Tasks may schedule or cancel tasks while firing.
#[derive(Clone)]
pub struct ManualScheduler {
    clock: ManualClock,
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    /// Creates a scheduler that drives `clock`.
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            state: Rc::new(RefCell::new(ManualState::default())),
        }
    }

    /// The clock this scheduler advances.
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Number of tasks that have not been cancelled.
    pub fn active_tasks(&self) -> usize {
        self.state
            .borrow()
            .entries
            .iter()
            .filter(|e| !e.cancelled.get())
            .count()
    }

    /// Moves time forward by `delta_ms`, firing due tasks on the way.
    pub fn advance(&self, delta_ms: u64) {
        let target = self.clock.now_ms() + delta_ms;

        while let Some((id, at)) = self.next_due(target) {
            // A clock moved ahead by hand never runs backwards.
            let now = at.max(self.clock.now_ms());
            self.clock.set(now);
            self.fire(id, now);
        }

        self.state
            .borrow_mut()
            .entries
            .retain(|e| !e.cancelled.get());
        self.clock.set(target);
    }

    fn next_due(&self, target: Timestamp) -> Option<(u64, Timestamp)> {
        self.state
            .borrow()
            .entries
            .iter()
            .filter(|e| !e.cancelled.get() && e.next_fire <= target)
            .min_by_key(|e| (e.next_fire, e.id))
            .map(|e| (e.id, e.next_fire))
    }

    fn fire(&self, id: u64, now: Timestamp) {
        let task = {
            let mut state = self.state.borrow_mut();
            let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) else {
                return;
            };
            // Overdue ticks collapse into one, like `MissedTickBehavior::Skip`.
            entry.next_fire = if entry.next_fire < now {
                now + entry.every_ms
            } else {
                entry.next_fire + entry.every_ms
            };
            entry.task.take()
        };

        // No borrow is held while the task runs.
        if let Some(mut task) = task {
            task();
            let mut state = self.state.borrow_mut();
            if let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) {
                entry.task = Some(task);
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, every: Duration, task: Task) -> TaskHandle {
        let every_ms = u64::try_from(every.as_millis()).unwrap_or(u64::MAX).max(1);
        let cancelled = Rc::new(Cell::new(false));

        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.entries.push(Entry {
            id,
            every_ms,
            next_fire: self.clock.now_ms() + every_ms,
            task: Some(task),
            cancelled: Rc::clone(&cancelled),
        });

        TaskHandle::new(move || cancelled.set(true))
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.clock.now_ms())
            .field("active_tasks", &self.active_tasks())
            .finish()
    }
}
