//! The `history` command.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use super::commands::HistoryArgs;
use super::display::Display;
use super::open_store;
use crate::history::{generate_demo_sessions, render_timeline, Timeframe};
use crate::session::{SessionRecord, SessionStore};
use crate::types::{PomodoroConfig, Timestamp};

/// Loads the sessions to show and prints them.
pub fn show_history(args: &HistoryArgs, config: &PomodoroConfig, now: Timestamp) -> Result<()> {
    let records = if args.demo {
        demo_records(now)?
    } else {
        let data_dir = args.data_dir.as_deref().or(config.data_dir.as_deref());
        open_store(data_dir)?
            .load_all()
            .context("セッション履歴を読み込めません")?
    };

    let (records, timeline) = build_timeline(records, args.day, usize::from(args.width))?;
    Display::show_history(&records, &timeline);
    Ok(())
}

/// Records for the generated sample sessions ending at `now`.
pub fn demo_records(now: Timestamp) -> Result<Vec<SessionRecord>> {
    generate_demo_sessions(now)
        .iter()
        .map(|session| SessionRecord::new(session, now).map_err(Into::into))
        .collect()
}

/// Picks the timeframe and renders the timeline.
///
/// With `day`, only sessions overlapping that day's working window are kept.
pub fn build_timeline(
    records: Vec<SessionRecord>,
    day: Option<NaiveDate>,
    width: usize,
) -> Result<(Vec<SessionRecord>, Vec<String>)> {
    let (records, frame) = match day {
        Some(day) => {
            let frame = Timeframe::working_day(day)
                .with_context(|| format!("{} の時間帯を計算できません", day))?;
            let records: Vec<_> = records
                .into_iter()
                .filter(|r| overlaps(r, frame))
                .collect();
            (records, frame)
        }
        None => match Timeframe::covering(&records) {
            Some(frame) => (records, frame),
            None => return Ok((records, Vec::new())),
        },
    };

    let timeline = render_timeline(&records, frame, width);
    Ok((records, timeline))
}

fn overlaps(record: &SessionRecord, frame: Timeframe) -> bool {
    match (record.started_at(), record.ended_at()) {
        (Some(start), Some(end)) => start <= frame.end() && end >= frame.start,
        _ => false,
    }
}
