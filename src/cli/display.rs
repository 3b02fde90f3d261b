//! Display utilities for the Pomodoro CLI.
//!
//! This module provides formatted output for:
//! - Timer snapshots while a session runs
//! - Session count updates
//! - Stored session history
//! - Error messages

use crate::history::format_hm;
use crate::session::SessionRecord;
use crate::types::{Snapshot, TimerPhase};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the session banner and the key help.
    pub fn show_banner(work_minutes: u32, session_count: usize) {
        println!("ポモドーロタイマー ({}分)", work_minutes);
        println!("─────────────────────────────");
        println!("記録済みセッション: {}", session_count);
        println!("コマンド: s=開始  p=一時停止  r=リセット  q=終了");
    }

    /// Shows a timer snapshot.
    pub fn show_snapshot(snapshot: &Snapshot) {
        println!("{}", Self::format_snapshot(snapshot));
    }

    /// Shows the updated session count.
    pub fn show_session_count(count: usize) {
        println!("* セッションを保存しました (合計: {})", count);
    }

    /// Shows the stored sessions and the timeline below them.
    pub fn show_history(records: &[SessionRecord], timeline: &[String]) {
        if records.is_empty() {
            println!("記録されたセッションはありません");
            return;
        }

        println!("セッション履歴 ({}件)", records.len());
        println!("─────────────────────────────");
        for line in records.iter().map(Self::format_record) {
            println!("{}", line);
        }
        println!();
        for line in timeline {
            println!("{}", line);
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Shows a hint below an error message.
    pub fn show_hint(hint: &str) {
        eprintln!("  ヒント: {}", hint);
    }

    /// One line per snapshot: state marker, remaining time and state label.
    pub fn format_snapshot(snapshot: &Snapshot) -> String {
        let (minutes, seconds) = Self::format_time(snapshot.remaining_seconds());
        let (marker, label) = match snapshot.phase() {
            TimerPhase::Running => (">", "作業中"),
            TimerPhase::Idle if snapshot.elapsed_ms == 0 => ("[]", "待機中"),
            TimerPhase::Idle => ("||", "一時停止中"),
            TimerPhase::Done => ("*", "完了"),
        };
        format!("{} {:02}:{:02} {}", marker, minutes, seconds, label)
    }

    /// `HH:MM-HH:MM  NN分` for a stored session.
    pub fn format_record(record: &SessionRecord) -> String {
        let start = record.started_at().map_or_else(|| "--:--".to_string(), format_hm);
        let end = record.ended_at().map_or_else(|| "--:--".to_string(), format_hm);
        let pauses = (record.data.len() / 2).saturating_sub(1);
        format!(
            "{}-{}  {:>3}分  (一時停止 {}回)",
            start,
            end,
            record.focused_ms() / 60_000,
            pauses
        )
    }

    /// Formats remaining seconds as (minutes, seconds).
    fn format_time(total_seconds: u64) -> (u64, u64) {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        (minutes, seconds)
    }
}

// ============================================================================
// Tests
// ============================================================================
