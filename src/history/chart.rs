//! Text rendering of session history.
//!
//! The timeframe is laid out horizontally across `width` columns using the
//! same [`Viz`] mapping as the graphical layout, with one row per session.

use super::geometry::Rect;
use super::layout::{format_hm, Viz};
use super::timeframe::Timeframe;
use crate::types::Timestamp;

/// Cell covered by a running interval.
pub const FOCUS_CELL: char = '█';
/// Cell inside a session but between intervals.
pub const PAUSE_CELL: char = '·';
/// Cell outside any session.
pub const EMPTY_CELL: char = ' ';

/// Renders one row per session plus a time axis line.
pub fn render_timeline<S: AsRef<[Timestamp]>>(
    sessions: &[S],
    timeframe: Timeframe,
    width: usize,
) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let viz = Viz::new(Rect::new(0.0, 0.0, 1.0, width as f64), 0.0, timeframe);

    let mut lines: Vec<String> = sessions
        .iter()
        .map(|session| render_row(&viz, session.as_ref(), width))
        .collect();
    lines.push(axis_line(timeframe, width));
    lines
}

fn render_row(viz: &Viz, session: &[Timestamp], width: usize) -> String {
    let mut cells = vec![EMPTY_CELL; width];

    if let (Some(&first), Some(&last)) = (session.first(), session.last()) {
        fill(&mut cells, viz, first, last, PAUSE_CELL);
    }
    for bell in viz.dumbbells(session) {
        let (from, to) = columns(bell.y1, bell.y2, width);
        cells[from..to].iter_mut().for_each(|c| *c = FOCUS_CELL);
    }

    cells.into_iter().collect()
}

fn fill(cells: &mut [char], viz: &Viz, from: Timestamp, to: Timestamp, cell: char) {
    let (from, to) = columns(viz.offset_of(from), viz.offset_of(to), cells.len());
    cells[from..to].iter_mut().for_each(|c| *c = cell);
}

/// Column range touched by `[start, end]`, always at least one column wide
/// when it overlaps the chart.
fn columns(start: f64, end: f64, width: usize) -> (usize, usize) {
    let max = width as f64;
    if end < 0.0 || start >= max {
        return (0, 0);
    }
    let from = start.max(0.0).floor() as usize;
    let to = (end.min(max).ceil() as usize).clamp(from + 1, width);
    (from, to)
}

fn axis_line(timeframe: Timeframe, width: usize) -> String {
    let start = format_hm(timeframe.start);
    let end = format_hm(timeframe.end());
    let gap = width.saturating_sub(start.len() + end.len());
    if gap == 0 {
        return start;
    }
    format!("{}{}{}", start, " ".repeat(gap), end)
}
