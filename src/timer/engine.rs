//! Session timer engine.
//!
//! This module drives a single Pomodoro session:
//! - Start / stop / reset requests recorded in a [`TimestampLedger`]
//! - A 1-second periodic re-evaluation while running
//! - Snapshots clamped to the configured duration, published on a [`Channel`]
//!
//! Invalid requests (start while running or done, stop while idle) are
//! logged and ignored; they are ordinary double-click races, not errors.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, warn};

use super::channel::{Channel, Subscriber};
use super::clock::Clock;
use super::ledger::TimestampLedger;
use super::scheduler::{Scheduler, TaskHandle};
use crate::types::{Snapshot, TimerRequest, Timestamp};

/// Interval between re-evaluations while running.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Rounds to the nearest whole second, halves rounding up.
pub fn round_to_nearest_second(ms: u64) -> u64 {
    (ms + 500) / 1000 * 1000
}

/// Derives the published snapshot from raw elapsed time.
///
/// Any elapsed reading at or past the duration yields exactly the finished
/// snapshot, however large the overshoot.
pub fn derive_snapshot(elapsed_raw_ms: u64, duration_ms: u64) -> Snapshot {
    let elapsed = round_to_nearest_second(elapsed_raw_ms);
    if elapsed >= duration_ms {
        Snapshot::finished(duration_ms)
    } else {
        Snapshot::running(elapsed, duration_ms)
    }
}

// ============================================================================
// SessionTimer
// ============================================================================

struct Core {
    ledger: TimestampLedger,
    /// Present iff the timer is running.
    task: Option<TaskHandle>,
    /// Closed ledger of the last finished session. Kept across `reset`,
    /// cleared by the next `start`.
    finished: Option<Vec<Timestamp>>,
}

struct Inner {
    clock: Rc<dyn Clock>,
    scheduler: Rc<dyn Scheduler>,
    core: RefCell<Core>,
    channel: Channel<Snapshot>,
}

/// Handle to the session timer.
///
/// Clones share the same timer. No internal borrow is held while subscribers
/// run, so subscribers may query the timer or issue requests.
#[derive(Clone)]
pub struct SessionTimer {
    inner: Rc<Inner>,
}

/// Non-owning handle, for subscribers that need to query the timer.
#[derive(Clone)]
pub struct WeakSessionTimer {
    inner: Weak<Inner>,
}

impl WeakSessionTimer {
    /// Returns the timer if it is still alive.
    pub fn upgrade(&self) -> Option<SessionTimer> {
        self.inner.upgrade().map(|inner| SessionTimer { inner })
    }
}

impl SessionTimer {
    /// Creates an idle timer for a session of `duration_ms`.
    pub fn new(
        duration_ms: u64,
        clock: impl Clock + 'static,
        scheduler: impl Scheduler + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                clock: Rc::new(clock),
                scheduler: Rc::new(scheduler),
                core: RefCell::new(Core {
                    ledger: TimestampLedger::new(duration_ms),
                    task: None,
                    finished: None,
                }),
                channel: Channel::new(Snapshot::initial(duration_ms)),
            }),
        }
    }

    /// Dispatches a user request.
    pub fn request(&self, request: TimerRequest) {
        debug!("Request: {}", request);
        match request {
            TimerRequest::Start => self.start(),
            TimerRequest::Stop => self.stop(),
            TimerRequest::Reset => self.reset(),
        }
    }

    /// Starts or resumes counting.
    pub fn start(&self) {
        let current = self.snapshot();
        if !current.paused || current.done {
            warn!("Unable to start: timer is {}", current.phase().as_str());
            return;
        }

        let snapshot = {
            let mut core = self.inner.core.borrow_mut();
            if core.task.is_some() {
                warn!("Unable to start: a periodic task is already active");
                return;
            }
            let now = self.inner.clock.now_ms();
            if !core.ledger.record_play(now) {
                warn!("Ledger refused play timestamp at {}", now);
                return;
            }
            core.finished = None;

            let snapshot = derive_snapshot(core.ledger.elapsed_total(now), core.ledger.duration_ms());
            if snapshot.done {
                // Resumed with less than half a second left.
                Self::finish(&mut core, now);
            } else {
                core.task = Some(self.schedule_ticks());
            }
            snapshot
        };

        self.publish(snapshot);
    }

    /// Pauses counting. No-op unless running.
    pub fn stop(&self) {
        let current = self.snapshot();
        {
            let mut core = self.inner.core.borrow_mut();
            if current.paused || core.task.is_none() {
                warn!("Unable to stop: timer is {}", current.phase().as_str());
                return;
            }
            let now = self.inner.clock.now_ms();
            Self::close_interval(&mut core, now);
        }

        self.publish(current.as_paused());
    }

    /// Discards the session and publishes the initial snapshot.
    pub fn reset(&self) {
        let duration_ms = {
            let mut core = self.inner.core.borrow_mut();
            if let Some(mut task) = core.task.take() {
                task.cancel();
            }
            let duration_ms = core.ledger.duration_ms();
            core.ledger = TimestampLedger::new(duration_ms);
            duration_ms
        };

        self.publish(Snapshot::initial(duration_ms));
    }

    fn tick(&self) {
        let snapshot = {
            let mut core = self.inner.core.borrow_mut();
            if core.task.is_none() {
                return;
            }
            let now = self.inner.clock.now_ms();
            let snapshot = derive_snapshot(core.ledger.elapsed_total(now), core.ledger.duration_ms());
            if snapshot.done {
                Self::finish(&mut core, now);
            }
            snapshot
        };

        self.publish(snapshot);
    }

    fn schedule_ticks(&self) -> TaskHandle {
        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.schedule(
            TICK_INTERVAL,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    SessionTimer { inner }.tick();
                }
            }),
        )
    }

    /// Cancels the periodic task and records the closing pause.
    fn close_interval(core: &mut Core, now: Timestamp) {
        if let Some(mut task) = core.task.take() {
            task.cancel();
        }
        if !core.ledger.record_pause(now) {
            warn!("Ledger refused pause timestamp at {}", now);
        }
    }

    /// Closes the last interval and keeps the finished ledger.
    fn finish(core: &mut Core, now: Timestamp) {
        Self::close_interval(core, now);
        core.finished = Some(core.ledger.timestamps().to_vec());
        debug!("Session finished");
    }

    fn publish(&self, snapshot: Snapshot) {
        debug!(
            "Publishing snapshot: phase={} elapsed={}ms remaining={}ms",
            snapshot.phase().as_str(),
            snapshot.elapsed_ms,
            snapshot.remaining_ms
        );
        self.inner.channel.set_state(snapshot);
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.channel.state()
    }

    /// The raw ledger sequence for this session.
    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.inner.core.borrow().ledger.timestamps().to_vec()
    }

    /// The closed ledger of the most recently finished session.
    ///
    /// Unlike [`timestamps`](Self::timestamps), this survives `reset` so that
    /// subscribers reacting to the done snapshot see the session even if an
    /// earlier subscriber already reset the timer.
    pub fn finished_timestamps(&self) -> Option<Vec<Timestamp>> {
        self.inner.core.borrow().finished.clone()
    }

    /// Time covered by closed play/pause pairs.
    pub fn recorded_ms(&self) -> u64 {
        self.inner.core.borrow().ledger.settled_total()
    }

    /// Unrounded elapsed time, including any running interval.
    pub fn elapsed_ms(&self) -> u64 {
        let now = self.inner.clock.now_ms();
        self.inner.core.borrow().ledger.elapsed_total(now)
    }

    /// Configured session length.
    pub fn duration_ms(&self) -> u64 {
        self.inner.core.borrow().ledger.duration_ms()
    }

    /// Returns true while the periodic re-evaluation is scheduled.
    pub fn is_ticking(&self) -> bool {
        self.inner.core.borrow().task.is_some()
    }

    /// Attaches a snapshot subscriber.
    pub fn subscribe(&self, subscriber: Rc<dyn Subscriber<Snapshot>>) -> bool {
        self.inner.channel.attach(subscriber)
    }

    /// Detaches a snapshot subscriber.
    pub fn unsubscribe(&self, subscriber: &Rc<dyn Subscriber<Snapshot>>) -> bool {
        self.inner.channel.detach(subscriber)
    }

    /// Returns a handle that does not keep the timer alive.
    pub fn downgrade(&self) -> WeakSessionTimer {
        WeakSessionTimer {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTimer")
            .field("snapshot", &self.snapshot())
            .field("timestamps", &self.timestamps())
            .field("ticking", &self.is_ticking())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
