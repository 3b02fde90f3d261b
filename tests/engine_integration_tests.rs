//! Integration tests for the session timer engine.
//!
//! These tests drive the public API with a manual clock and scheduler:
//! - Snapshot consistency (elapsed + remaining = duration)
//! - Clamping of overshoot, including large clock jumps
//! - Ledger parity and monotonicity under arbitrary request sequences
//! - Idempotent start/stop and reset from every state
//! - Subscriber ordering and re-entrant requests

use std::cell::RefCell;
use std::rc::Rc;

use pomodoro_history::timer::{observer, ManualClock, ManualScheduler, SessionTimer, Subscriber};
use pomodoro_history::types::{Snapshot, TimerRequest, Timestamp};

// ============================================================================
// Test Helpers
// ============================================================================

const DURATION: u64 = 1_500_000;
const EPOCH: Timestamp = 1_714_000_000_000;

struct Rig {
    timer: SessionTimer,
    scheduler: ManualScheduler,
    seen: Rc<RefCell<Vec<Snapshot>>>,
}

fn create_rig(duration: u64) -> Rig {
    let clock = ManualClock::new(EPOCH);
    let scheduler = ManualScheduler::new(clock.clone());
    let timer = SessionTimer::new(duration, clock, scheduler.clone());

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    timer.subscribe(observer(move |s: &Snapshot| sink.borrow_mut().push(*s)));

    Rig {
        timer,
        scheduler,
        seen,
    }
}

fn assert_consistent(snapshots: &[Snapshot], duration: u64) {
    for s in snapshots {
        assert_eq!(s.elapsed_ms + s.remaining_ms, duration, "{:?}", s);
        assert!(s.elapsed_ms <= duration);
        assert_eq!(s.elapsed_ms % 1_000, 0, "elapsed not whole seconds: {:?}", s);
        if s.done {
            assert!(s.paused);
            assert_eq!(s.remaining_ms, 0);
        }
    }
}

// ============================================================================
// Full Session
// ============================================================================

#[test]
fn test_full_session_publishes_every_second() {
    let rig = create_rig(60_000);
    rig.timer.start();
    rig.scheduler.advance(60_000);

    let seen = rig.seen.borrow();
    // start + 60 ticks
    assert_eq!(seen.len(), 61);
    assert_eq!(seen[0], Snapshot::running(0, 60_000));
    assert_eq!(seen[30], Snapshot::running(30_000, 60_000));
    assert_eq!(*seen.last().unwrap(), Snapshot::finished(60_000));
    assert_consistent(&seen, 60_000);
}

#[test]
fn test_overshoot_clamps_to_duration() {
    let rig = create_rig(DURATION);
    rig.timer.start();
    rig.scheduler.advance(DURATION + 5_678);

    assert_eq!(rig.timer.snapshot(), Snapshot::finished(DURATION));
    assert_eq!(rig.seen.borrow().iter().filter(|s| s.done).count(), 1);
    assert_eq!(rig.timer.timestamps(), vec![EPOCH, EPOCH + DURATION]);
    assert_consistent(&rig.seen.borrow(), DURATION);
}

#[test]
fn test_suspended_clock_is_clamped_on_next_tick() {
    let rig = create_rig(DURATION);
    rig.timer.start();
    rig.scheduler.advance(3_000);

    // No ticks while the machine sleeps for three hours.
    rig.scheduler.clock().advance(3 * 3_600_000);
    rig.scheduler.advance(1_000);

    assert_eq!(rig.timer.snapshot(), Snapshot::finished(DURATION));
    assert!(!rig.timer.is_ticking());
    assert_consistent(&rig.seen.borrow(), DURATION);
}

// ============================================================================
// Request Sequences
// ============================================================================

#[test]
fn test_start_stop_sequence_accumulates() {
    let rig = create_rig(DURATION);

    rig.timer.request(TimerRequest::Start);
    rig.scheduler.advance(10_000);
    rig.timer.request(TimerRequest::Stop);
    rig.scheduler.advance(120_000);
    rig.timer.request(TimerRequest::Start);
    rig.scheduler.advance(30_000);
    rig.timer.request(TimerRequest::Stop);

    let last = rig.timer.snapshot();
    assert_eq!(last.elapsed_ms, 40_000);
    assert_eq!(last.remaining_ms, DURATION - 40_000);
    assert!(last.paused);
    assert_eq!(rig.timer.timestamps().len(), 4);
    assert_eq!(rig.timer.recorded_ms(), 40_000);
}

#[test]
fn test_arbitrary_requests_keep_ledger_well_formed() {
    let rig = create_rig(20_000);
    let script = [
        (TimerRequest::Stop, 0),
        (TimerRequest::Start, 500),
        (TimerRequest::Start, 1_500),
        (TimerRequest::Stop, 2_200),
        (TimerRequest::Stop, 10),
        (TimerRequest::Start, 7_000),
        (TimerRequest::Start, 25_000),
        (TimerRequest::Stop, 1_000),
        (TimerRequest::Reset, 0),
        (TimerRequest::Start, 3_300),
        (TimerRequest::Stop, 0),
    ];

    for (request, delay) in script {
        rig.scheduler.advance(delay);
        rig.timer.request(request);

        let timestamps = rig.timer.timestamps();
        assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(timestamps.len() % 2 == 1, rig.timer.is_ticking());
        assert!(rig.scheduler.active_tasks() <= 1);
    }

    assert_consistent(&rig.seen.borrow(), 20_000);
}

#[test]
fn test_reset_returns_to_initial_from_every_state() {
    for setup in 0..4 {
        let rig = create_rig(DURATION);
        match setup {
            1 => rig.timer.start(),
            2 => {
                rig.timer.start();
                rig.scheduler.advance(5_000);
                rig.timer.stop();
            }
            3 => {
                rig.timer.start();
                rig.scheduler.advance(DURATION);
            }
            _ => {}
        }

        rig.timer.reset();

        assert_eq!(rig.timer.snapshot(), Snapshot::initial(DURATION), "setup {}", setup);
        assert!(rig.timer.timestamps().is_empty());
        assert_eq!(rig.scheduler.active_tasks(), 0);
    }
}

// ============================================================================
// Subscribers
// ============================================================================

#[test]
fn test_subscribers_notified_in_attach_order() {
    let rig = create_rig(DURATION);
    let order = Rc::new(RefCell::new(Vec::new()));
    for name in ["display", "recorder", "sound"] {
        let order = Rc::clone(&order);
        rig.timer
            .subscribe(observer(move |_: &Snapshot| order.borrow_mut().push(name)));
    }

    rig.timer.start();
    assert_eq!(*order.borrow(), vec!["display", "recorder", "sound"]);
}

#[test]
fn test_duplicate_subscribe_and_unknown_unsubscribe() {
    let rig = create_rig(DURATION);
    let count = Rc::new(RefCell::new(0));
    let inner = Rc::clone(&count);
    let sub: Rc<dyn Subscriber<Snapshot>> = observer(move |_: &Snapshot| *inner.borrow_mut() += 1);

    assert!(rig.timer.subscribe(Rc::clone(&sub)));
    assert!(!rig.timer.subscribe(Rc::clone(&sub)));
    rig.timer.start();
    assert_eq!(*count.borrow(), 1);

    assert!(rig.timer.unsubscribe(&sub));
    assert!(!rig.timer.unsubscribe(&sub));
    rig.scheduler.advance(1_000);
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_subscriber_may_stop_the_timer() {
    let rig = create_rig(DURATION);
    let weak = rig.timer.downgrade();
    rig.timer.subscribe(observer(move |s: &Snapshot| {
        if s.elapsed_ms == 5_000 && !s.paused {
            if let Some(timer) = weak.upgrade() {
                timer.stop();
            }
        }
    }));

    rig.timer.start();
    rig.scheduler.advance(60_000);

    let seen = rig.seen.borrow();
    assert_eq!(
        &seen[seen.len() - 2..],
        &[
            Snapshot::running(5_000, DURATION),
            Snapshot::running(5_000, DURATION).as_paused()
        ]
    );
    assert!(!rig.timer.is_ticking());
    assert_eq!(rig.timer.timestamps(), vec![EPOCH, EPOCH + 5_000]);
}

#[test]
fn test_weak_handle_does_not_keep_timer_alive() {
    let rig = create_rig(DURATION);
    let weak = rig.timer.downgrade();
    assert!(weak.upgrade().is_some());

    let Rig { timer, .. } = rig;
    drop(timer);
    assert!(weak.upgrade().is_none());
}
