//! Play/pause timestamp ledger.
//!
//! Entries alternate strictly: even indices are plays, odd indices are
//! pauses. A recording of the wrong kind for the current parity is refused.
//! Nothing is ever removed; a reset replaces the whole ledger.

use crate::types::Timestamp;

/// Ordered record of alternating start/stop instants for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampLedger {
    timestamps: Vec<Timestamp>,
    duration_ms: u64,
}

impl TimestampLedger {
    /// Creates an empty ledger for a session of the given length.
    pub fn new(duration_ms: u64) -> Self {
        Self {
            timestamps: Vec::new(),
            duration_ms,
        }
    }

    /// Configured session length in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// The raw recorded sequence.
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Records a play instant. Returns false if a pause was expected.
    pub fn record_play(&mut self, now: Timestamp) -> bool {
        self.record(now, true)
    }

    /// Records a pause instant. Returns false if a play was expected.
    pub fn record_pause(&mut self, now: Timestamp) -> bool {
        self.record(now, false)
    }

    fn record(&mut self, now: Timestamp, play: bool) -> bool {
        let expects_play = self.timestamps.len() % 2 == 0;
        if expects_play != play {
            return false;
        }
        self.timestamps.push(now);
        true
    }

    /// The start of the unterminated play, if one is in progress.
    pub fn latest_open_start(&self) -> Option<Timestamp> {
        if self.timestamps.len() % 2 == 1 {
            self.timestamps.last().copied()
        } else {
            None
        }
    }

    /// Time since the open play started, if one is in progress.
    pub fn time_since_latest_open_start(&self, now: Timestamp) -> Option<u64> {
        self.latest_open_start()
            .map(|start| now.saturating_sub(start))
    }

    /// Complete `(start, stop)` pairs in recording order.
    pub fn closed_pairs(&self) -> impl Iterator<Item = (Timestamp, Timestamp)> + '_ {
        self.timestamps
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
    }

    /// Total time covered by closed pairs. An open trailing play adds nothing.
    pub fn settled_total(&self) -> u64 {
        self.closed_pairs()
            .map(|(start, stop)| stop.saturating_sub(start))
            .sum()
    }

    /// Settled total plus the running open interval, if any.
    pub fn elapsed_total(&self, now: Timestamp) -> u64 {
        self.settled_total() + self.time_since_latest_open_start(now).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DURATION: u64 = 1_500_000;

    mod recording_tests {
        use super::*;

        #[test]
        fn test_new_ledger_is_empty() {
            let ledger = TimestampLedger::new(DURATION);
            assert!(ledger.is_empty());
            assert_eq!(ledger.duration_ms(), DURATION);
            assert_eq!(ledger.latest_open_start(), None);
        }

        #[test]
        fn test_play_then_pause_alternates() {
            let mut ledger = TimestampLedger::new(DURATION);
            assert!(ledger.record_play(1_000));
            assert!(ledger.record_pause(2_000));
            assert!(ledger.record_play(3_000));
            assert_eq!(ledger.timestamps(), &[1_000, 2_000, 3_000]);
        }

        #[test]
        fn test_pause_first_is_rejected() {
            let mut ledger = TimestampLedger::new(DURATION);
            assert!(!ledger.record_pause(1_000));
            assert!(ledger.is_empty());
        }

        #[test]
        fn test_double_play_is_rejected() {
            let mut ledger = TimestampLedger::new(DURATION);
            assert!(ledger.record_play(1_000));
            assert!(!ledger.record_play(1_500));
            assert_eq!(ledger.timestamps(), &[1_000]);
        }

        #[test]
        fn test_double_pause_is_rejected() {
            let mut ledger = TimestampLedger::new(DURATION);
            ledger.record_play(1_000);
            ledger.record_pause(2_000);
            assert!(!ledger.record_pause(2_500));
            assert_eq!(ledger.len(), 2);
        }
    }

    mod totals_tests {
        use super::*;

        #[test]
        fn test_latest_open_start() {
            let mut ledger = TimestampLedger::new(DURATION);
            ledger.record_play(1_000);
            assert_eq!(ledger.latest_open_start(), Some(1_000));
            assert_eq!(ledger.time_since_latest_open_start(4_000), Some(3_000));

            ledger.record_pause(2_000);
            assert_eq!(ledger.latest_open_start(), None);
            assert_eq!(ledger.time_since_latest_open_start(4_000), None);
        }

        #[test]
        fn test_settled_total_sums_closed_pairs() {
            let mut ledger = TimestampLedger::new(DURATION);
            ledger.record_play(0);
            ledger.record_pause(10_000);
            ledger.record_play(20_000);
            ledger.record_pause(50_000);
            assert_eq!(ledger.settled_total(), 40_000);
        }

        #[test]
        fn test_settled_total_ignores_open_start() {
            let mut ledger = TimestampLedger::new(DURATION);
            ledger.record_play(0);
            ledger.record_pause(10_000);
            ledger.record_play(20_000);
            assert_eq!(ledger.settled_total(), 10_000);
        }

        #[test]
        fn test_elapsed_total_includes_open_interval() {
            let mut ledger = TimestampLedger::new(DURATION);
            ledger.record_play(0);
            ledger.record_pause(10_000);
            ledger.record_play(20_000);
            assert_eq!(ledger.elapsed_total(25_000), 15_000);
        }

        #[test]
        fn test_elapsed_total_when_closed_ignores_now() {
            let mut ledger = TimestampLedger::new(DURATION);
            ledger.record_play(0);
            ledger.record_pause(10_000);
            assert_eq!(ledger.elapsed_total(99_000), 10_000);
        }

        #[test]
        fn test_closed_pairs() {
            let mut ledger = TimestampLedger::new(DURATION);
            ledger.record_play(1);
            ledger.record_pause(2);
            ledger.record_play(3);
            let pairs: Vec<_> = ledger.closed_pairs().collect();
            assert_eq!(pairs, vec![(1, 2)]);
        }
    }
}
