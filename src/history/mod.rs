//! Session history layout.
//!
//! Pure functions turning stored sessions (alternating play/pause timestamps)
//! into chart geometry:
//! - [`Rect`] and its padding inset
//! - [`Timeframe`] windows (covering the data, or a working day)
//! - [`Viz`] mapping time onto the content area, with [`Dumbbell`]s and [`AxisTick`]s
//! - a text timeline for the terminal

mod chart;
mod geometry;
mod layout;
mod timeframe;

pub use chart::{render_timeline, EMPTY_CELL, FOCUS_CELL, PAUSE_CELL};
pub use geometry::Rect;
pub use layout::{
    format_hm, AxisTick, Dumbbell, Viz, DEFAULT_PADDING, DEFAULT_TICK_COUNT, DUMBBELL_RADIUS,
};
pub use timeframe::{Timeframe, DEFAULT_DAY_HOURS, DEFAULT_DAY_START_HOUR};

use crate::types::Timestamp;

/// Length of each demo session.
pub const DEMO_SESSION_MS: u64 = 1_500_000;

/// Spacing between consecutive demo sessions.
pub const DEMO_SPACING_MS: u64 = 2_500_000;

/// Three back-to-back 25-minute sessions, the last one ending at `reference`.
///
/// Ordered oldest first.
pub fn generate_demo_sessions(reference: Timestamp) -> Vec<Vec<Timestamp>> {
    let latest = [reference.saturating_sub(DEMO_SESSION_MS), reference];
    (0..3u64)
        .rev()
        .map(|n| {
            latest
                .iter()
                .map(|t| t.saturating_sub(n * DEMO_SPACING_MS))
                .collect()
        })
        .collect()
}

/// The very first and very last timestamp across all sessions, in order.
pub fn first_and_last<S: AsRef<[Timestamp]>>(sessions: &[S]) -> Option<(Timestamp, Timestamp)> {
    let mut flat = sessions.iter().flat_map(|s| s.as_ref().iter().copied());
    let first = flat.next()?;
    let last = flat.last().unwrap_or(first);
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REF: Timestamp = 1_700_000_000_000;

    #[test]
    fn test_generate_demo_sessions() {
        let sessions = generate_demo_sessions(REF);
        assert_eq!(
            sessions,
            vec![
                vec![REF - 1_500_000 - 5_000_000, REF - 5_000_000],
                vec![REF - 1_500_000 - 2_500_000, REF - 2_500_000],
                vec![REF - 1_500_000, REF],
            ]
        );
    }

    #[test]
    fn test_first_and_last() {
        let sessions = generate_demo_sessions(REF);
        assert_eq!(
            first_and_last(&sessions),
            Some((REF - 6_500_000, REF))
        );
    }

    #[test]
    fn test_first_and_last_single_timestamp() {
        assert_eq!(first_and_last(&[vec![42u64]]), Some((42, 42)));
    }

    #[test]
    fn test_first_and_last_empty() {
        let empty: Vec<Vec<Timestamp>> = vec![vec![], vec![]];
        assert_eq!(first_and_last(&empty), None);
    }

    #[test]
    fn test_demo_sessions_fill_covering_viz() {
        let sessions = generate_demo_sessions(REF);
        let frame = Timeframe::covering(&sessions).unwrap();
        let viz = Viz::new(Rect::new(0.0, 0.0, 200.0, 670.0), DEFAULT_PADDING, frame);

        let last = viz.dumbbells(&sessions[2]);
        assert!((last[0].y2 - viz.content.height).abs() < 1e-6);
        let first = viz.dumbbells(&sessions[0]);
        assert_eq!(first[0].y1, 0.0);
    }
}
