//! Pomodoro History Library
//!
//! This library provides the core functionality for the Pomodoro History CLI.
//! It includes:
//! - Session timer engine driven by a play/pause timestamp ledger
//! - Synchronous publish/subscribe channel for timer snapshots
//! - Session persistence and the stored session count
//! - Completion sound playback
//! - Session history layout and a text timeline
//! - CLI command parsing and display utilities
//! - Type definitions for configuration and snapshots

pub mod cli;
pub mod config;
pub mod history;
pub mod session;
pub mod sound;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{PomodoroConfig, Snapshot, TimerPhase, TimerRequest, Timestamp};

// Re-export timer types
pub use timer::{
    observer, Channel, Clock, ManualClock, ManualScheduler, Scheduler, SessionTimer, Subscriber,
    SystemClock, TaskHandle, TimestampLedger, TokioScheduler, WeakSessionTimer,
};

// Re-export session types
pub use session::{JsonFileStore, MemoryStore, SessionRecord, SessionRecorder, SessionStore, StoreError};

// Re-export sound types
pub use sound::{CompletionSound, MockSoundPlayer, SoundError, SoundPlayer, SoundSource};

// Re-export config types
pub use config::{ConfigError, ConfigStore, FileConfigStore};
