//! Foreground session runner for the `run` command.
//!
//! Everything lives on one thread: the timer ticks through `spawn_local`
//! tasks inside a `LocalSet`, and stdin commands are handled between ticks.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::LocalSet;
use tracing::{debug, info};

use super::display::Display;
use super::open_store;
use crate::session::SessionRecorder;
use crate::sound::{default_player, CompletionSound, SoundSource};
use crate::timer::{observer, SessionTimer, SystemClock, TokioScheduler};
use crate::types::{PomodoroConfig, Snapshot, TimerRequest};

/// A line typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Request(TimerRequest),
    Quit,
    Empty,
}

/// Parses one line of interactive input.
///
/// # Errors
///
/// Returns a user-facing message for unknown commands.
pub fn parse_input(line: &str) -> Result<InputCommand, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(InputCommand::Empty);
    }
    if matches!(trimmed.to_ascii_lowercase().as_str(), "q" | "quit" | "exit") {
        return Ok(InputCommand::Quit);
    }
    trimmed.parse().map(InputCommand::Request)
}

/// Runs an interactive session until the user quits.
///
/// When stdin is closed the runner keeps going until the timer is no longer
/// running, so `run --start < /dev/null` times a single session.
pub async fn run_session(config: &PomodoroConfig, autostart: bool) -> Result<()> {
    LocalSet::new().run_until(drive(config, autostart)).await
}

async fn drive(config: &PomodoroConfig, autostart: bool) -> Result<()> {
    let timer = SessionTimer::new(config.duration_ms(), SystemClock, TokioScheduler);

    let (phase_tx, mut phase_rx) = watch::channel(timer.snapshot());
    timer.subscribe(observer(move |snapshot: &Snapshot| {
        Display::show_snapshot(snapshot);
        phase_tx.send_replace(*snapshot);
    }));

    let store = open_store(config.data_dir.as_deref())?;
    let recorder = SessionRecorder::attach(&timer, store);
    recorder.subscribe_count(observer(|count: &usize| Display::show_session_count(*count)));

    let _sound = config.sound.then(|| {
        let source = SoundSource::from_setting(config.sound_file.as_deref());
        CompletionSound::attach(&timer, source, default_player)
    });

    Display::show_banner(config.work_minutes, recorder.session_count());
    if autostart {
        timer.start();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line.context("標準入力の読み込みに失敗しました")? {
                    Some(text) => match parse_input(&text) {
                        Ok(InputCommand::Request(request)) => timer.request(request),
                        Ok(InputCommand::Quit) => break,
                        Ok(InputCommand::Empty) => {}
                        Err(message) => Display::show_error(&message),
                    },
                    None => {
                        debug!("stdin closed");
                        stdin_open = false;
                    }
                }
            }
            changed = phase_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }

        if !stdin_open && !timer.snapshot().is_running() {
            break;
        }
    }

    debug!("Session runner finished: {:?}", timer);
    Ok(())
}
