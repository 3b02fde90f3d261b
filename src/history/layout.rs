//! Layout of sessions inside a chart.
//!
//! Time runs along the vertical axis of the content area. Each closed
//! play/pause pair becomes a [`Dumbbell`]: a circle at each end joined by a
//! thin span. Coordinates are relative to the content area.

use chrono::{Local, TimeZone};

use super::geometry::Rect;
use super::timeframe::Timeframe;
use crate::types::Timestamp;

/// Padding between the chart bounds and its content.
pub const DEFAULT_PADDING: f64 = 10.0;

/// Radius of the circles at each end of a dumbbell.
pub const DUMBBELL_RADIUS: f64 = 4.0;

/// Number of ticks on the time axis.
pub const DEFAULT_TICK_COUNT: usize = 12;

/// Formats a timestamp as local 24-hour `HH:MM`.
pub fn format_hm(t: Timestamp) -> String {
    i64::try_from(t)
        .ok()
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map_or_else(|| "--:--".to_string(), |dt| dt.format("%H:%M").to_string())
}

/// A chart: outer bounds, padded content area and the time it shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viz {
    pub bounds: Rect,
    pub content: Rect,
    pub timeframe: Timeframe,
    /// Content units per millisecond.
    pub ms_to_px: f64,
}

impl Viz {
    pub fn new(bounds: Rect, padding: f64, timeframe: Timeframe) -> Self {
        let content = bounds.inset(padding);
        let ms_to_px = if timeframe.duration_ms == 0 {
            0.0
        } else {
            content.height / timeframe.duration_ms as f64
        };

        Self {
            bounds,
            content,
            timeframe,
            ms_to_px,
        }
    }

    /// Offset of `t` from the top of the content area.
    pub fn offset_of(&self, t: Timestamp) -> f64 {
        (t as f64 - self.timeframe.start as f64) * self.ms_to_px
    }

    /// One dumbbell per closed pair of `session`. A trailing open start is
    /// ignored.
    pub fn dumbbells(&self, session: &[Timestamp]) -> Vec<Dumbbell> {
        let x = self.content.width / 2.0;
        session
            .chunks_exact(2)
            .map(|pair| Dumbbell {
                x,
                y1: self.offset_of(pair[0]),
                y2: self.offset_of(pair[1]),
                radius: DUMBBELL_RADIUS,
                label_start: format_hm(pair[0]),
                label_end: format_hm(pair[1]),
            })
            .collect()
    }

    /// `tick_count` evenly spaced ticks from the top to the bottom of the
    /// content area.
    pub fn axis_ticks(&self, tick_count: usize) -> Vec<AxisTick> {
        match tick_count {
            0 => Vec::new(),
            1 => vec![AxisTick {
                y: 0.0,
                at: self.timeframe.start,
                label: format_hm(self.timeframe.start),
            }],
            _ => {
                let segments = (tick_count - 1) as f64;
                (0..tick_count)
                    .map(|index| {
                        let fraction = index as f64 / segments;
                        let at = self.timeframe.start
                            + (self.timeframe.duration_ms as f64 * fraction).round() as u64;
                        AxisTick {
                            y: self.content.height * fraction,
                            at,
                            label: format_hm(at),
                        }
                    })
                    .collect()
            }
        }
    }
}

/// One play/pause pair laid out on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Dumbbell {
    pub x: f64,
    pub y1: f64,
    pub y2: f64,
    pub radius: f64,
    pub label_start: String,
    pub label_end: String,
}

impl Dumbbell {
    /// The bar joining the two circles.
    pub fn span(&self) -> Rect {
        let half = self.radius / 2.0;
        Rect::new(self.x - half / 2.0, self.y1, half, self.y2 - self.y1)
    }
}

/// A labelled position on the time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub y: f64,
    pub at: Timestamp,
    pub label: String,
}
