//! CLI module for the Pomodoro timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `runner`: The interactive `run` command
//! - `history`: The `history` command
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod display;
pub mod history;
pub mod runner;

use std::path::Path;

use anyhow::{Context, Result};

pub use commands::{Cli, Commands, HistoryArgs, RunArgs};
pub use display::Display;
pub use history::show_history;
pub use runner::{parse_input, run_session, InputCommand};

use crate::session::JsonFileStore;

/// Opens the session store in `data_dir`, or in the platform data directory.
pub fn open_store(data_dir: Option<&Path>) -> Result<JsonFileStore> {
    match data_dir {
        Some(dir) => Ok(JsonFileStore::new(dir)),
        None => JsonFileStore::at_default_location()
            .context("セッション履歴の保存先を決定できません"),
    }
}
