//! Core data types for the Pomodoro Timer.
//!
//! This module defines the data structures used for:
//! - Timestamps and the snapshots published by the timer engine
//! - User requests sent to the engine
//! - Timer configuration with validation

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: u64 = 60 * 1000;

// ============================================================================
// TimerPhase
// ============================================================================

/// The state-machine position a snapshot describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Not counting: never started, or paused mid-session
    Idle,
    /// Counting down
    Running,
    /// The full duration has elapsed
    Done,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Done => "done",
        }
    }
}

impl Default for TimerPhase {
    fn default() -> Self {
        TimerPhase::Idle
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Immutable view of the timer at one instant.
///
/// `elapsed_ms + remaining_ms` always equals the configured duration, and a
/// done snapshot is always paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Elapsed time, rounded to whole seconds and clamped to the duration
    pub elapsed_ms: u64,
    /// Time left until the session is done
    pub remaining_ms: u64,
    /// Whether the countdown is currently stopped
    pub paused: bool,
    /// Whether the full duration has elapsed
    pub done: bool,
}

impl Snapshot {
    /// The canonical state of a fresh timer.
    pub fn initial(duration_ms: u64) -> Self {
        Self {
            elapsed_ms: 0,
            remaining_ms: duration_ms,
            paused: true,
            done: false,
        }
    }

    /// A running snapshot with the given elapsed time.
    pub fn running(elapsed_ms: u64, duration_ms: u64) -> Self {
        Self {
            elapsed_ms,
            remaining_ms: duration_ms.saturating_sub(elapsed_ms),
            paused: false,
            done: false,
        }
    }

    /// The terminal snapshot: all of the duration elapsed.
    pub fn finished(duration_ms: u64) -> Self {
        Self {
            elapsed_ms: duration_ms,
            remaining_ms: 0,
            paused: true,
            done: true,
        }
    }

    /// Returns a copy of this snapshot with `paused` set.
    #[must_use]
    pub fn as_paused(self) -> Self {
        Self {
            paused: true,
            ..self
        }
    }

    /// Returns the phase this snapshot describes.
    pub fn phase(&self) -> TimerPhase {
        if self.done {
            TimerPhase::Done
        } else if self.paused {
            TimerPhase::Idle
        } else {
            TimerPhase::Running
        }
    }

    /// Returns true if the timer is counting down.
    pub fn is_running(&self) -> bool {
        self.phase() == TimerPhase::Running
    }

    /// Remaining time in whole seconds.
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_ms / 1000
    }
}

// ============================================================================
// TimerRequest
// ============================================================================

/// A user request to the timer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerRequest {
    /// Begin or resume counting
    Start,
    /// Pause counting
    Stop,
    /// Discard the session and return to the initial state
    Reset,
}

impl TimerRequest {
    /// Returns the string representation of the request.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerRequest::Start => "start",
            TimerRequest::Stop => "stop",
            TimerRequest::Reset => "reset",
        }
    }
}

impl fmt::Display for TimerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => Ok(TimerRequest::Start),
            "stop" | "pause" | "p" => Ok(TimerRequest::Stop),
            "reset" | "r" => Ok(TimerRequest::Reset),
            other => Err(format!("不明なコマンドです: {}", other)),
        }
    }
}

// ============================================================================
// PomodoroConfig
// ============================================================================

/// Configuration for the Pomodoro timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroConfig {
    /// Session duration in minutes (1-120)
    pub work_minutes: u32,
    /// Whether to play a sound when a session completes
    pub sound: bool,
    /// Custom sound file played on completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_file: Option<PathBuf>,
    /// Directory holding the session history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            sound: true,
            sound_file: None,
            data_dir: None,
        }
    }
}

impl PomodoroConfig {
    /// Sets the session duration.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Enables or disables the completion sound.
    pub fn with_sound(mut self, enabled: bool) -> Self {
        self.sound = enabled;
        self
    }

    /// Sets a custom completion sound file.
    pub fn with_sound_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sound_file = Some(path.into());
        self
    }

    /// Sets the session history directory.
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Session duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.work_minutes) * MS_PER_MINUTE
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` if the duration is outside 1-120 minutes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.work_minutes < 1 || self.work_minutes > 120 {
            return Err(ConfigError::OutOfRange {
                field: "work_minutes",
                value: self.work_minutes,
                min: 1,
                max: 120,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
