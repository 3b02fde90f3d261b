//! Time windows for charting sessions.

use chrono::{Local, NaiveDate, TimeZone};

use super::first_and_last;
use crate::types::{Timestamp, MS_PER_MINUTE};

/// Hour of day the default day window starts at.
pub const DEFAULT_DAY_START_HOUR: u32 = 8;

/// Length of the default day window in hours.
pub const DEFAULT_DAY_HOURS: u32 = 12;

const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// A span of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeframe {
    pub start: Timestamp,
    pub duration_ms: u64,
}

impl Timeframe {
    pub fn new(start: Timestamp, duration_ms: u64) -> Self {
        Self { start, duration_ms }
    }

    pub fn end(&self) -> Timestamp {
        self.start + self.duration_ms
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        (self.start..=self.end()).contains(&t)
    }

    /// The span from the first to the last recorded timestamp.
    ///
    /// A single instant gets a one-hour window starting there. Returns `None`
    /// when there are no timestamps.
    pub fn covering<S: AsRef<[Timestamp]>>(sessions: &[S]) -> Option<Self> {
        let (first, last) = first_and_last(sessions)?;
        let duration_ms = last.saturating_sub(first);
        if duration_ms == 0 {
            return Some(Self::new(first, MS_PER_HOUR));
        }
        Some(Self::new(first, duration_ms))
    }

    /// `hours` hours of `date` starting at `start_hour`, in local time.
    ///
    /// Returns `None` if that local time does not exist or predates the epoch.
    pub fn day_window(date: NaiveDate, start_hour: u32, hours: u32) -> Option<Self> {
        let naive = date.and_hms_opt(start_hour, 0, 0)?;
        let start = Local.from_local_datetime(&naive).earliest()?;
        let start = u64::try_from(start.timestamp_millis()).ok()?;
        Some(Self::new(start, u64::from(hours) * MS_PER_HOUR))
    }

    /// The default 08:00 + 12 h window of `date`.
    pub fn working_day(date: NaiveDate) -> Option<Self> {
        Self::day_window(date, DEFAULT_DAY_START_HOUR, DEFAULT_DAY_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_and_contains() {
        let frame = Timeframe::new(1_000, 500);
        assert_eq!(frame.end(), 1_500);
        assert!(frame.contains(1_000));
        assert!(frame.contains(1_500));
        assert!(!frame.contains(1_501));
    }

    #[test]
    fn test_covering_sessions() {
        let sessions = vec![vec![100, 200], vec![300, 400, 500, 900]];
        assert_eq!(Timeframe::covering(&sessions), Some(Timeframe::new(100, 800)));
    }

    #[test]
    fn test_covering_single_instant() {
        let sessions = vec![vec![5_000, 5_000]];
        assert_eq!(
            Timeframe::covering(&sessions),
            Some(Timeframe::new(5_000, MS_PER_HOUR))
        );
    }

    #[test]
    fn test_covering_empty() {
        let sessions: Vec<Vec<Timestamp>> = Vec::new();
        assert_eq!(Timeframe::covering(&sessions), None);
    }

    #[test]
    fn test_working_day_spans_twelve_hours() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let frame = Timeframe::working_day(date).unwrap();
        assert_eq!(frame.duration_ms, 12 * MS_PER_HOUR);

        let expected = Local
            .with_ymd_and_hms(2024, 3, 14, 8, 0, 0)
            .earliest()
            .unwrap()
            .timestamp_millis();
        assert_eq!(frame.start as i64, expected);
    }

    #[test]
    fn test_day_window_rejects_invalid_hour() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        assert_eq!(Timeframe::day_window(date, 24, 1), None);
    }
}
